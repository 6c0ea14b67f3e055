use itertools::Itertools;
use quickcheck::{quickcheck, TestResult};

use urbanpar::{partition, partitions, split_partitions_mut};

/// Count how often each index of `[0, len)` is covered.
fn coverage(len: usize, workers: usize) -> Vec<usize>
{
    let mut seen = vec![0; len];
    for p in partitions(len, workers).unwrap() {
        for i in p.range() {
            seen[i] += 1;
        }
    }
    seen
}

#[test]
fn ten_elements_three_workers()
{
    let ps = (0..3)
        .map(|w| partition(10, 3, w).unwrap())
        .map(|p| (p.worker(), p.start(), p.end()))
        .collect_vec();
    assert_eq!(ps, [(0, 0, 3), (1, 3, 6), (2, 6, 10)]);
}

#[test]
fn last_worker_takes_remainder()
{
    for (len, workers) in itertools::iproduct!(0..40usize, 1..9usize) {
        let ps = partitions(len, workers).unwrap().collect_vec();
        let chunk = len / workers;
        for p in &ps[..workers - 1] {
            assert_eq!(p.len(), chunk);
        }
        assert_eq!(ps[workers - 1].len(), len - (workers - 1) * chunk);
    }
}

quickcheck! {
    fn partitions_cover_exactly_once(len: u16, workers: u8) -> TestResult {
        let (len, workers) = (len as usize, workers as usize);
        if workers == 0 || workers > len {
            return TestResult::discard();
        }
        let sizes: usize = partitions(len, workers).unwrap().map(|p| p.len()).sum();
        TestResult::from_bool(sizes == len && coverage(len, workers).iter().all(|&c| c == 1))
    }

    fn excess_workers_get_empty_partitions(len: u8, extra: u8) -> bool {
        let len = len as usize;
        let workers = len + extra as usize + 1;
        let ps = partitions(len, workers).unwrap().collect_vec();
        ps.iter().take(workers - 1).all(|p| p.is_empty() && p.end() <= len)
            && coverage(len, workers).iter().all(|&c| c == 1)
    }

    fn partitions_are_contiguous(len: u16, workers: u8) -> TestResult {
        if workers == 0 {
            return TestResult::discard();
        }
        let ps = partitions(len as usize, workers as usize).unwrap().collect_vec();
        let contiguous = ps.iter().tuple_windows().all(|(a, b)| a.end() == b.start());
        TestResult::from_bool(contiguous && ps[0].start() == 0 && ps.last().unwrap().end() == len as usize)
    }
}

#[test]
fn split_matches_partitions()
{
    let mut data = (0..23).collect_vec();
    let expected = partitions(23, 5).unwrap().collect_vec();
    let pieces = split_partitions_mut(&mut data, 5).unwrap();
    for ((p, chunk), q) in pieces.iter().zip(&expected) {
        assert_eq!(p, q);
        assert_eq!(chunk.to_vec(), q.range().collect_vec());
    }
}
