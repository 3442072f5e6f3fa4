use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vqmatch::{select_window, VqError, WindowParams};

fn params(recency_factor: f64, subsampling_factor: f64) -> WindowParams {
    WindowParams {
        recency_factor,
        subsampling_factor,
    }
}

fn window(query_frame: usize, recency_factor: f64, subsampling_factor: f64) -> Vec<usize> {
    select_window(query_frame, params(recency_factor, subsampling_factor))
        .unwrap()
        .into_vec()
}

#[test]
fn unit_factors_keep_every_previous_frame() {
    for query_frame in [1usize, 2, 7, 64, 301] {
        let expected: Vec<usize> = (0..query_frame).collect();
        assert_eq!(window(query_frame, 1.0, 1.0), expected);
    }
}

#[test]
fn recency_keeps_most_recent_frames() {
    assert_eq!(window(10, 0.5, 1.0), vec![5, 6, 7, 8, 9]);
    assert_eq!(window(100, 0.03, 1.0), vec![97, 98, 99]);
}

#[test]
fn recency_rounds_ties_to_even() {
    // 5 * 0.5 = 2.5 -> 2, 7 * 0.5 = 3.5 -> 4
    assert_eq!(window(5, 0.5, 1.0), vec![3, 4]);
    assert_eq!(window(7, 0.5, 1.0), vec![3, 4, 5, 6]);
}

#[test]
fn recency_above_one_keeps_everything() {
    assert_eq!(window(6, 1.5, 1.0), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn subsampling_spreads_samples_over_window() {
    let selected = window(10, 1.0, 0.5);
    assert_eq!(selected, vec![0, 2, 4, 6, 9]);
}

#[test]
fn subsampling_applies_after_recency() {
    // 25 recent frames, floor(0.1 * 25) = 2 samples at both ends.
    assert_eq!(window(100, 0.25, 0.1), vec![75, 99]);
    // 3 recent frames, a single sample at the start of the recency window.
    assert_eq!(window(10, 0.3, 0.4), vec![7]);
}

#[test]
fn zero_factors_leave_window_unfiltered() {
    let full: Vec<usize> = (0..12).collect();
    assert_eq!(window(12, 0.0, 1.0), full);
    assert_eq!(window(12, 1.0, 0.0), full);
    assert_eq!(window(12, 0.0, 0.0), full);
    // floor(0.05 * 12) = 0 samples also keeps the recency window.
    assert_eq!(window(12, 0.5, 0.05), vec![6, 7, 8, 9, 10, 11]);
}

#[test]
fn query_at_first_frame_searches_nothing() {
    assert!(window(0, 1.0, 1.0).is_empty());
    assert!(window(0, 0.5, 0.5).is_empty());
}

#[test]
fn invalid_factors_are_rejected() {
    let err = select_window(10, params(-0.1, 1.0)).unwrap_err();
    assert_eq!(
        err,
        VqError::InvalidFactor {
            name: "recency_factor",
            value: -0.1,
        }
    );

    let err = select_window(10, params(1.0, 1.5)).unwrap_err();
    assert_eq!(
        err,
        VqError::InvalidFactor {
            name: "subsampling_factor",
            value: 1.5,
        }
    );

    assert!(select_window(10, params(f64::NAN, 1.0)).is_err());
    assert!(select_window(10, params(1.0, f64::INFINITY)).is_err());
}

/// First frame of the recency-filtered window.
fn recency_start(query_frame: usize, recency_factor: f64) -> usize {
    let keep = (query_frame as f64 * recency_factor).round_ties_even() as usize;
    if keep == 0 || keep >= query_frame {
        0
    } else {
        query_frame - keep
    }
}

#[test]
fn random_windows_are_increasing_and_bounded_by_recency_window() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..500 {
        let query_frame = rng.random_range(1usize..400);
        let recency = rng.random_range(0.0..=1.0);
        let subsampling = rng.random_range(0.0..=1.0);
        let selected = window(query_frame, recency, subsampling);

        let start = recency_start(query_frame, recency);
        let samples = (subsampling * (query_frame - start) as f64).floor() as usize;

        assert!(!selected.is_empty());
        assert!(selected.len() <= query_frame);
        assert!(selected.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(selected[0], start);
        if samples == 1 {
            assert_eq!(selected, vec![start]);
        } else {
            assert_eq!(*selected.last().unwrap(), query_frame - 1);
        }
    }
}
