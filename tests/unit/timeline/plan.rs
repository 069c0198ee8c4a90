use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

fn pool(n: usize) -> Vec<PathBuf> {
    (0..n).map(|i| PathBuf::from(format!("images/{i:02}.jpg"))).collect()
}

fn transitions(n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| PathBuf::from(format!("assets/transitions/t{i}.mp4")))
        .collect()
}

#[test]
fn selection_is_distinct_and_clamped_to_the_pool() {
    let mut rng = StdRng::seed_from_u64(1);
    for p in 1..10 {
        for n in 0..12 {
            let picked = select_images(&pool(p), n, &mut rng);
            assert_eq!(picked.len(), n.min(p));
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), picked.len());
        }
    }
}

#[test]
fn default_count_is_six_or_seven() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut seen = HashSet::new();
    for _ in 0..100 {
        let n = choose_image_count(None, 20, &mut rng);
        assert!(n == 6 || n == 7);
        seen.insert(n);
    }
    assert_eq!(seen.len(), 2);
    assert_eq!(choose_image_count(None, 3, &mut rng), 3);
    assert_eq!(choose_image_count(Some(10), 4, &mut rng), 4);
}

#[test]
fn empty_pool_fails_with_configuration_error() {
    let mut rng = StdRng::seed_from_u64(3);
    let err = plan_timeline(&[], &transitions(2), &AssemblyOptions::default(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
}

#[test]
fn transitions_interleave_between_every_image_pair() {
    let mut rng = StdRng::seed_from_u64(4);
    let opts = AssemblyOptions {
        image_count: None,
        filter: None,
        use_transitions: true,
    };
    let plan = plan_timeline(&pool(8), &transitions(3), &opts, &mut rng).unwrap();
    let n = plan.image_count();
    assert!(n == 6 || n == 7);
    assert_eq!(plan.transition_count(), n - 1);
    for (i, entry) in plan.entries.iter().enumerate() {
        let expect_image = i % 2 == 0;
        assert_eq!(matches!(entry, PlanEntry::Image { .. }), expect_image);
    }
    assert!(matches!(plan.entries.last(), Some(PlanEntry::Image { .. })));

    let format = ReelFormat::default();
    let secs = format.fps.frames_to_secs(plan.duration_frames(&format));
    assert!((secs - (n as f64 * 2.0 + (n as f64 - 1.0))).abs() < 1e-9);
}

#[test]
fn transitions_are_skipped_when_disabled_or_missing() {
    let mut rng = StdRng::seed_from_u64(5);
    let opts = AssemblyOptions {
        image_count: Some(4),
        filter: Some(FilterKind::Cool),
        use_transitions: false,
    };
    let plan = plan_timeline(&pool(8), &transitions(3), &opts, &mut rng).unwrap();
    assert_eq!(plan.entries.len(), 4);
    assert_eq!(plan.filter, FilterKind::Cool);

    let opts = AssemblyOptions {
        use_transitions: true,
        ..opts
    };
    let plan = plan_timeline(&pool(8), &[], &opts, &mut rng).unwrap();
    assert_eq!(plan.transition_count(), 0);
}

#[test]
fn same_seed_gives_the_same_plan() {
    let opts = AssemblyOptions {
        use_transitions: true,
        ..AssemblyOptions::default()
    };
    let a = plan_timeline(&pool(8), &transitions(3), &opts, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = plan_timeline(&pool(8), &transitions(3), &opts, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zoom_ratios_are_drawn_per_image() {
    let mut rng = StdRng::seed_from_u64(6);
    let opts = AssemblyOptions {
        image_count: Some(7),
        ..AssemblyOptions::default()
    };
    let plan = plan_timeline(&pool(8), &[], &opts, &mut rng).unwrap();
    for entry in &plan.entries {
        let PlanEntry::Image { motion, .. } = entry else {
            panic!("unexpected transition");
        };
        assert!(KenBurns::ZOOM_RANGE.contains(&motion.zoom_ratio));
    }
}
