//! End-to-end field scenarios: observations derived from known poses with
//! zero noise, run through the full matcher pipeline.

use approx::assert_relative_eq;
use rekha_match::{
    FieldLine, LineMatcher, LineMatchingResult, MatchingConfig, Point2D, Pose2D, PoseCovariance,
    MAX_LINE_OBSERVATIONS,
};

const CAMERA_HEIGHT: f32 = 550.0;

/// Center line along X and center line along Y: a crossing.
fn crossing_map() -> Vec<FieldLine> {
    vec![
        FieldLine::map_line(Point2D::new(-4500.0, 0.0), Point2D::new(4500.0, 0.0)),
        FieldLine::map_line(Point2D::new(0.0, -3000.0), Point2D::new(0.0, 3000.0)),
    ]
}

/// Two sidelines parallel to the X axis, 4 m apart.
fn parallel_map() -> Vec<FieldLine> {
    vec![
        FieldLine::map_line(Point2D::new(-4500.0, 0.0), Point2D::new(4500.0, 0.0)),
        FieldLine::map_line(Point2D::new(-4500.0, 4000.0), Point2D::new(4500.0, 4000.0)),
    ]
}

/// Express an absolute segment as a robot-relative observation.
fn observe_segment(start: Point2D, end: Point2D, pose: &Pose2D) -> FieldLine {
    FieldLine::new(
        pose.inverse_transform_point(&start),
        pose.inverse_transform_point(&end),
        CAMERA_HEIGHT,
    )
}

fn observe_map(map: &[FieldLine], pose: &Pose2D) -> Vec<FieldLine> {
    map.iter()
        .map(|line| observe_segment(line.start, line.end, pose))
        .collect()
}

fn run_frame(
    map: Vec<FieldLine>,
    observations: &[FieldLine],
    candidates: &[(Pose2D, PoseCovariance)],
) -> LineMatchingResult {
    let matcher = LineMatcher::new(MatchingConfig::default()).expect("valid config");
    let mut result = LineMatchingResult::new(map);
    result.reset();
    result.set_observations(observations);
    matcher.update(&mut result, candidates);
    result
}

#[test]
fn crossing_yields_single_exact_hypothesis() {
    let truth = Pose2D::new(1000.0, 1500.0, 0.3);
    let map = crossing_map();
    let observations = observe_map(&map, &truth);

    let result = run_frame(
        map,
        &observations,
        &[(truth, PoseCovariance::zero())],
    );

    assert!(result.contains_matches());
    assert!(result.contains_unique_matches());
    assert!(!result.contains_non_unique_matches());
    assert_eq!(result.pose_hypotheses.len(), 1);

    let pose = result.pose_hypotheses[0].pose;
    assert_relative_eq!(pose.x, truth.x, epsilon = 1.0);
    assert_relative_eq!(pose.y, truth.y, epsilon = 1.0);
    assert_relative_eq!(pose.theta, truth.theta, epsilon = 0.01);

    // Both observation slots are filled, the rest carry the sentinel.
    let slots = result.pose_hypotheses[0].correspondences;
    assert!(slots[0].is_some() && slots[1].is_some());
    assert!(slots[2..].iter().all(|slot| slot.is_none()));
}

#[test]
fn parallel_sidelines_yield_interval_not_unique_pose() {
    let truth = Pose2D::new(500.0, 2000.0, 0.0);
    let map = parallel_map();
    // Both sidelines observed almost fully, 500 mm short at the far end.
    // Close enough to the mapped endpoints to pass the acceptance threshold,
    // but leaving 500 mm of unobserved map for the pose to slide into.
    let observations = vec![
        observe_segment(Point2D::new(-4500.0, 0.0), Point2D::new(4000.0, 0.0), &truth),
        observe_segment(
            Point2D::new(-4500.0, 4000.0),
            Point2D::new(4000.0, 4000.0),
            &truth,
        ),
    ];

    let result = run_frame(map, &observations, &[(truth, PoseCovariance::zero())]);

    assert!(result.contains_matches());
    assert!(!result.contains_unique_matches());
    assert!(result.contains_non_unique_matches());
    assert_eq!(result.pose_hypothesis_intervals.len(), 1);

    let interval = &result.pose_hypothesis_intervals[0];
    assert_relative_eq!(interval.start.theta, truth.theta, epsilon = 0.01);
    assert_relative_eq!(interval.end.theta, truth.theta, epsilon = 0.01);
    assert_relative_eq!(interval.start.y, truth.y, epsilon = 1.0);
    assert_relative_eq!(interval.end.y, truth.y, epsilon = 1.0);
    // The unobserved 500 mm of sideline admits poses in [500, 1000] along x.
    assert!(interval.start.x < interval.end.x);
    assert_relative_eq!(interval.start.x, 500.0, epsilon = 1.0);
    assert_relative_eq!(interval.end.x, 1000.0, epsilon = 1.0);
}

#[test]
fn single_observed_line_raises_flag_only() {
    let truth = Pose2D::new(0.0, 1000.0, 0.0);
    let map = crossing_map();
    let observations = vec![observe_segment(
        Point2D::new(-4500.0, 0.0),
        Point2D::new(4500.0, 0.0),
        &truth,
    )];

    let result = run_frame(map, &observations, &[(truth, PoseCovariance::zero())]);

    assert!(result.only_observed_one_field_line);
    assert!(!result.contains_matches());
}

#[test]
fn oversized_observation_set_is_truncated_not_fatal() {
    let truth = Pose2D::new(800.0, 600.0, 0.1);
    let map = crossing_map();
    let mut observations = observe_map(&map, &truth);
    // Pad far past the capacity with slightly shifted copies.
    for i in 0..12 {
        let shift = 50.0 * (i + 1) as f32;
        observations.push(observe_segment(
            Point2D::new(-4500.0 + shift, shift),
            Point2D::new(4500.0 + shift, shift),
            &truth,
        ));
    }
    assert!(observations.len() > MAX_LINE_OBSERVATIONS);

    let result = run_frame(map, &observations, &[(truth, PoseCovariance::zero())]);

    assert_eq!(result.observations().len(), MAX_LINE_OBSERVATIONS);
    for hypothesis in &result.pose_hypotheses {
        assert_eq!(hypothesis.correspondences.len(), MAX_LINE_OBSERVATIONS);
    }
}

#[test]
fn reset_clears_previous_frame_entirely() {
    let truth = Pose2D::new(1000.0, 1500.0, 0.3);
    let map = crossing_map();
    let observations = observe_map(&map, &truth);

    let matcher = LineMatcher::new(MatchingConfig::default()).expect("valid config");
    let mut result = LineMatchingResult::new(map);
    result.set_observations(&observations);
    matcher.update(&mut result, &[(truth, PoseCovariance::zero())]);
    assert!(result.contains_matches());

    result.reset();

    assert!(!result.contains_matches());
    assert!(result.observations().is_empty());
    assert!(result.observations_spherical().is_empty());
    assert!(!result.only_observed_one_field_line);
}

#[test]
fn correspondence_query_is_deterministic() {
    let truth = Pose2D::new(250.0, -750.0, -0.2);
    let map = crossing_map();
    let observations = observe_map(&map, &truth);

    let mut result = LineMatchingResult::new(map);
    result.set_observations(&observations);
    result.calculate_observations_spherical_coords();

    let config = MatchingConfig::default();
    let covariance = PoseCovariance::diagonal(10000.0, 10000.0, 0.01);
    let mut first = Vec::new();
    let mut second = Vec::new();
    let found_first = result.get_correspondences_for_localization_hypothesis(
        &truth, &covariance, &config, &mut first, false, true,
    );
    let found_second = result.get_correspondences_for_localization_hypothesis(
        &truth, &covariance, &config, &mut second, false, true,
    );

    assert!(found_first && found_second);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn correspondence_query_pairs_are_in_matched_order() {
    let truth = Pose2D::new(100.0, 200.0, 0.0);
    let map = crossing_map();
    let observations = observe_map(&map, &truth);

    let mut result = LineMatchingResult::new(map.clone());
    result.set_observations(&observations);
    result.calculate_observations_spherical_coords();

    let mut pairs = Vec::new();
    let found = result.get_correspondences_for_localization_hypothesis(
        &truth,
        &PoseCovariance::zero(),
        &MatchingConfig::default(),
        &mut pairs,
        false,
        true,
    );

    assert!(found);
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].0, observations[0]);
    assert_eq!(pairs[0].1, map[0]);
    assert_eq!(pairs[1].0, observations[1]);
    assert_eq!(pairs[1].1, map[1]);
}

#[test]
fn raising_threshold_never_adds_matches() {
    let truth = Pose2D::new(300.0, 400.0, 0.15);
    let map = crossing_map();
    let observations = observe_map(&map, &truth);

    let mut result = LineMatchingResult::new(map);
    result.set_observations(&observations);
    result.calculate_observations_spherical_coords();

    // Perturbed candidate so likelihoods land strictly between 0 and 1.
    let candidate = Pose2D::new(380.0, 360.0, 0.18);
    let mut previous = usize::MAX;
    for threshold in [0.01, 0.1, 0.4, 0.8, 0.999] {
        let config = MatchingConfig {
            likelihood_threshold: threshold,
            ..Default::default()
        };
        let mut pairs = Vec::new();
        result.get_correspondences_for_localization_hypothesis(
            &candidate,
            &PoseCovariance::zero(),
            &config,
            &mut pairs,
            false,
            true,
        );
        assert!(pairs.len() <= previous);
        previous = pairs.len();
    }
}

#[test]
fn relative_projection_round_trips_through_the_pose() {
    let pose = Pose2D::new(-1200.0, 900.0, 1.1);
    let line = FieldLine::map_line(Point2D::new(2000.0, -500.0), Point2D::new(2500.0, 1500.0));

    let relative = observe_segment(line.start, line.end, &pose);
    let start_back = pose.transform_point(&relative.start);
    let end_back = pose.transform_point(&relative.end);

    assert_relative_eq!(start_back.x, line.start.x, epsilon = 1e-2);
    assert_relative_eq!(start_back.y, line.start.y, epsilon = 1e-2);
    assert_relative_eq!(end_back.x, line.end.x, epsilon = 1e-2);
    assert_relative_eq!(end_back.y, line.end.y, epsilon = 1e-2);
}

#[test]
fn wrong_candidate_pose_contributes_no_evidence() {
    let truth = Pose2D::new(1000.0, 1500.0, 0.3);
    let map = crossing_map();
    let observations = observe_map(&map, &truth);

    // One good candidate, one far off: exactly one hypothesis results.
    let result = run_frame(
        map,
        &observations,
        &[
            (Pose2D::new(-4000.0, -2500.0, 2.8), PoseCovariance::zero()),
            (truth, PoseCovariance::zero()),
        ],
    );

    assert_eq!(result.pose_hypotheses.len(), 1);
    assert_relative_eq!(result.pose_hypotheses[0].pose.x, truth.x, epsilon = 1.0);
}
