// tests/thresholds.rs
//
// Property checks on the configured threshold tables: strict ordering,
// inclusive lower-bucket boundaries, monotonic labeling across each
// backend's native range, and normalized-scale agreement between backends.

use texto_guard::config::ModerationConfig;
use texto_guard::score::Label;
use texto_guard::sentiment::Method;

fn config() -> ModerationConfig {
    ModerationConfig::embedded().expect("embedded config")
}

fn rank(label: Label) -> u8 {
    match label {
        Label::VeryNegative => 0,
        Label::Negative => 1,
        Label::Neutral => 2,
        Label::Positive => 3,
        Label::VeryPositive => 4,
    }
}

#[test]
fn every_configured_table_is_strictly_ordered() {
    let cfg = config();
    for method in Method::ALL {
        let t = cfg.thresholds_for(method);
        assert!(
            t.is_strictly_increasing(),
            "{} table must be strictly increasing",
            method.as_str()
        );
    }
}

#[test]
fn negative_cutoff_labels_as_negative_for_every_method() {
    let cfg = config();
    for method in Method::ALL {
        let t = cfg.thresholds_for(method);
        assert_eq!(
            t.label(t.negative),
            Label::Negative,
            "boundary must belong to the lower bucket for {}",
            method.as_str()
        );
    }
}

#[test]
fn all_five_buckets_are_reachable_per_method() {
    let cfg = config();
    for method in Method::ALL {
        let t = cfg.thresholds_for(method);
        let [lo, hi] = method.score_bounds();
        let labels: Vec<Label> = (0..=100)
            .map(|i| lo + (hi - lo) * (i as f32 / 100.0))
            .map(|s| t.label(s))
            .collect();
        for expected in [
            Label::VeryNegative,
            Label::Negative,
            Label::Neutral,
            Label::Positive,
            Label::VeryPositive,
        ] {
            assert!(
                labels.contains(&expected),
                "{} never produced {:?}",
                method.as_str(),
                expected
            );
        }
    }
}

#[test]
fn labeling_is_monotonic_across_each_native_range() {
    let cfg = config();
    for method in Method::ALL {
        let t = cfg.thresholds_for(method);
        let [lo, hi] = method.score_bounds();
        let mut last = t.label(lo);
        for i in 0..=1000 {
            let s = lo + (hi - lo) * (i as f32 / 1000.0);
            let l = t.label(s);
            assert!(
                rank(l) >= rank(last),
                "label regressed for {} at score {s}",
                method.as_str()
            );
            last = l;
        }
    }
}

#[test]
fn normalization_maps_native_bounds_into_the_unit_interval() {
    for method in Method::ALL {
        let [lo, hi] = method.score_bounds();
        let range = method.range();
        for s in [lo, (lo + hi) / 2.0, hi] {
            let unit = range.to_unit_interval(s);
            assert!(
                (0.0..=1.0).contains(&unit),
                "{} score {s} escaped the unit interval",
                method.as_str()
            );
        }
        assert!(range.to_unit_interval(lo) <= range.to_unit_interval(hi));
    }
}

#[test]
fn signed_and_unit_backends_agree_on_the_neutral_point() {
    // The native neutral of each scale must normalize to 0.5.
    for method in Method::ALL {
        let range = method.range();
        let unit = range.to_unit_interval(range.neutral());
        assert!(
            (unit - 0.5).abs() < 1e-6,
            "{} neutral point must normalize to 0.5",
            method.as_str()
        );
    }
}
