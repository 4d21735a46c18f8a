use rand::Rng;

/// 按权重随机抽取一项 (有放回, 每次调用独立)
///
/// 权重和 <= 0 或池为空时返回 None, 由调用方决定兜底策略。
/// 算法: 在 [0, total) 均匀取 r, 沿池累加权重, 返回第一个累加和超过 r 的条目。
pub fn pick_weighted<'a, T>(pool: &'a [(T, f64)], rng: &mut impl Rng) -> Option<&'a T> {
    let total: f64 = pool.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let r = rng.gen_range(0.0..total);
    pick_at(pool, r)
}

/// 按权重和上的偏移量 r 定位条目
/// r 越界 (浮点累加误差) 时返回最后一项, 绝不返回空
fn pick_at<'a, T>(pool: &'a [(T, f64)], r: f64) -> Option<&'a T> {
    let mut acc = 0.0;
    for (item, w) in pool {
        acc += w.max(0.0);
        if r < acc {
            return Some(item);
        }
    }
    pool.last().map(|(item, _)| item)
}

/// 等概率抽取一项
pub fn pick_uniform<'a, T>(items: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..items.len());
    items.get(idx)
}

/// 按权重抽取; 权重全为 0 时退化为等概率抽取
/// 仅当池本身为空才返回 None
pub fn pick_weighted_or_uniform<'a, T>(pool: &'a [(T, f64)], rng: &mut impl Rng) -> Option<&'a T> {
    if let Some(item) = pick_weighted(pool, rng) {
        return Some(item);
    }
    if pool.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..pool.len());
    pool.get(idx).map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_distribution_converges() {
        // [(A,70),(B,30)] 抽 100_000 次, A 的频率应收敛到 0.70 附近
        let pool = vec![("A", 70.0), ("B", 30.0)];
        let mut rng = rand::thread_rng();

        let trials = 100_000;
        let mut hits_a = 0usize;
        for _ in 0..trials {
            match pick_weighted(&pool, &mut rng) {
                Some(&"A") => hits_a += 1,
                Some(&"B") => {}
                other => panic!("unexpected pick: {other:?}"),
            }
        }

        let freq = hits_a as f64 / trials as f64;
        assert!(
            (freq - 0.70).abs() < 0.02,
            "frequency of A drifted too far: {freq}"
        );
    }

    #[test]
    fn test_zero_weight_entry_never_selected() {
        let pool = vec![("A", 0.0), ("B", 10.0)];
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            assert_eq!(pick_weighted(&pool, &mut rng), Some(&"B"));
        }
    }

    #[test]
    fn test_zero_total_weight_falls_back_to_uniform() {
        // 权重全 0 的池: 仍必须每次都返回有效条目
        let pool = vec![("A", 0.0), ("B", 0.0)];
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            let picked = pick_weighted_or_uniform(&pool, &mut rng);
            assert!(matches!(picked, Some(&"A") | Some(&"B")));
        }
        assert_eq!(pick_weighted(&pool, &mut rng), None);
    }

    #[test]
    fn test_empty_pool() {
        let pool: Vec<(&str, f64)> = vec![];
        let mut rng = rand::thread_rng();
        assert_eq!(pick_weighted(&pool, &mut rng), None);
        assert_eq!(pick_weighted_or_uniform(&pool, &mut rng), None);
    }

    #[test]
    fn test_single_entry_pool() {
        let pool = vec![("only", 0.5)];
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            assert_eq!(pick_weighted(&pool, &mut rng), Some(&"only"));
        }
    }

    #[test]
    fn test_out_of_range_offset_returns_last() {
        // r 达到权重总和 (浮点误差路径) 时取最后一项
        let pool = vec![("A", 1.0), ("B", 2.0)];
        assert_eq!(pick_at(&pool, 3.0), Some(&"B"));
        assert_eq!(pick_at(&pool, 100.0), Some(&"B"));
    }

    #[test]
    fn test_offset_walk_boundaries() {
        let pool = vec![("A", 1.0), ("B", 2.0), ("C", 3.0)];
        assert_eq!(pick_at(&pool, 0.0), Some(&"A"));
        assert_eq!(pick_at(&pool, 0.99), Some(&"A"));
        assert_eq!(pick_at(&pool, 1.0), Some(&"B"));
        assert_eq!(pick_at(&pool, 2.99), Some(&"B"));
        assert_eq!(pick_at(&pool, 3.0), Some(&"C"));
        assert_eq!(pick_at(&pool, 5.99), Some(&"C"));
    }

    #[test]
    fn test_negative_weight_treated_as_zero() {
        let pool = vec![("bad", -5.0), ("good", 1.0)];
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            assert_eq!(pick_weighted(&pool, &mut rng), Some(&"good"));
        }
    }

    #[test]
    fn test_uniform_pick() {
        let items = vec!["a", "b", "c"];
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            assert!(pick_uniform(&items, &mut rng).is_some());
        }
        let empty: Vec<&str> = vec![];
        assert_eq!(pick_uniform(&empty, &mut rng), None);
    }
}
