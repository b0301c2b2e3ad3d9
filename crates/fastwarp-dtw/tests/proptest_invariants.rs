//! Property tests for alignment, downsampling and window invariants.

use fastwarp_dtw::{Dtw, Euclidean, FastDtw, Manhattan, Paa, SearchWindow, TimeSeries, WarpPath};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

const ABS_TOL: f64 = 1e-9;
const REL_TOL: f64 = 1e-9;

fn series(values: &[f64]) -> TimeSeries<f64> {
    TimeSeries::from_values(values.to_vec()).expect("generated values always form a valid series")
}

fn relative_close(actual: f64, expected: f64) -> bool {
    let diff = (actual - expected).abs();
    let scale = 1.0 + expected.abs();
    diff <= ABS_TOL || diff <= REL_TOL * scale
}

fn values(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, 1..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 1024,
        failure_persistence: Some(Box::new(FileFailurePersistence::Direct("proptest-regressions/tests/proptest_invariants.txt"))),
        .. ProptestConfig::default()
    })]

    #[test]
    fn exact_alignment_is_symmetric(a in values(40), b in values(40)) {
        prop_assume!(a.len() != b.len());
        let (a, b) = (series(&a), series(&b));
        let dtw = Dtw::new(Euclidean);
        let ab = dtw.warp_info(&a, &b).unwrap();
        let ba = dtw.warp_info(&b, &a).unwrap();
        prop_assert!(relative_close(ab.distance(), ba.distance()), "ab={} ba={}", ab.distance(), ba.distance());

        let mirrored = ba.path().inverted_copy();
        let cells = mirrored.cells();
        prop_assert_eq!((cells[0].i, cells[0].j), (0, 0));
        let last = cells[cells.len() - 1];
        prop_assert_eq!((last.i, last.j), (a.len() - 1, b.len() - 1));
        prop_assert!(WarpPath::from_cells(cells.to_vec()).is_ok());
        let cost = dtw.path_cost(&mirrored, &a, &b).unwrap();
        prop_assert!(relative_close(cost, ab.distance()), "mirrored={cost} ab={}", ab.distance());
    }

    #[test]
    fn self_alignment_costs_nothing(a in values(80), radius in 0isize..4) {
        let a = series(&a);
        prop_assert_eq!(Dtw::new(Manhattan).warp_distance(&a, &a).unwrap(), 0.0);
        let fast = FastDtw::new(Manhattan).with_radius(radius);
        prop_assert_eq!(fast.warp_distance(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn fast_path_is_anchored_and_monotone(a in values(90), b in values(90), radius in 0isize..5) {
        let (a, b) = (series(&a), series(&b));
        let info = FastDtw::new(Euclidean).with_radius(radius).warp_info(&a, &b).unwrap();
        let cells = info.path().cells();
        prop_assert_eq!((cells[0].i, cells[0].j), (0, 0));
        let last = cells[cells.len() - 1];
        prop_assert_eq!((last.i, last.j), (a.len() - 1, b.len() - 1));
        for pair in cells.windows(2) {
            let di = pair[1].i - pair[0].i;
            let dj = pair[1].j - pair[0].j;
            prop_assert!(di <= 1 && dj <= 1 && di + dj > 0, "step {} -> {}", pair[0], pair[1]);
        }
        let recomputed = Dtw::new(Euclidean).path_cost(info.path(), &a, &b).unwrap();
        prop_assert!(relative_close(recomputed, info.distance()));
    }

    #[test]
    fn fast_cost_never_below_exact(a in values(70), b in values(70), radius in 0isize..6) {
        let (a, b) = (series(&a), series(&b));
        let exact = Dtw::new(Euclidean).warp_distance(&a, &b).unwrap();
        let approx = FastDtw::new(Euclidean).with_radius(radius).warp_distance(&a, &b).unwrap();
        prop_assert!(approx >= exact - ABS_TOL * (1.0 + exact), "fast={approx} exact={exact}");
    }

    #[test]
    fn fast_converges_at_full_radius(a in values(50), b in values(50)) {
        let (a, b) = (series(&a), series(&b));
        let radius = isize::try_from(a.len().max(b.len())).unwrap();
        let exact = Dtw::new(Euclidean).warp_info(&a, &b).unwrap();
        let fast = FastDtw::new(Euclidean).with_radius(radius).warp_info(&a, &b).unwrap();
        prop_assert_eq!(fast, exact);
    }

    #[test]
    fn paa_blocks_cover_source(a in values(120), fraction in 0.0f64..1.0) {
        let a = series(&a);
        let shrunk_size = ((a.len() as f64 * fraction).floor() as usize).clamp(1, a.len());
        let paa = Paa::new(&a, shrunk_size).unwrap();
        prop_assert_eq!(paa.len(), shrunk_size);
        prop_assert!(paa.aggregate_sizes().iter().all(|&s| s >= 1));
        prop_assert_eq!(paa.aggregate_sizes().iter().sum::<usize>(), a.len());

        // each mean lies within its block's range
        let mut start = 0;
        for (k, &size) in paa.aggregate_sizes().iter().enumerate() {
            let block: Vec<f64> = (start..start + size).map(|i| a.measurement(i, 0).unwrap()).collect();
            let lo = block.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = block.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = paa.as_series().measurement(k, 0).unwrap();
            prop_assert!(mean >= lo - 1e-9 && mean <= hi + 1e-9);
            start += size;
        }
    }

    #[test]
    fn expansion_only_widens(
        size_i in 1usize..30,
        size_j in 1usize..30,
        marks in prop::collection::vec((0usize..30, 0usize..30), 1..20),
        radius in 0usize..4,
    ) {
        let mut window = SearchWindow::new(size_i, size_j);
        for (i, j) in marks {
            window.mark_visited(i % size_i, j % size_j);
        }
        let before = window.clone();
        window.expand(radius);
        prop_assert!(window.size() >= before.size());
        for cell in &before {
            prop_assert!(window.contains(cell.i, cell.j), "lost {}", cell);
        }
        for i in 0..size_i {
            if let (Some(old), Some(new)) = (before.column_range(i), window.column_range(i)) {
                prop_assert!(new.start() <= old.start() && new.end() >= old.end());
            } else {
                prop_assert!(before.column_range(i).is_none());
            }
        }
    }
}
