use std::cmp::Ordering;

/// Points not dominated in both coordinates, minimizing both.
///
/// Points are grouped by `x` in ascending order. From each group the points
/// with the smallest `y` are kept when that `y` is strictly below every `y`
/// seen at a smaller `x`.
pub fn pareto_front<T>(mut points: Vec<(f64, f64, T)>) -> Vec<(f64, f64, T)> {
    points.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));

    let mut front = Vec::new();
    let mut best_y = f64::INFINITY;
    let mut group_x: Option<f64> = None;
    let mut group_min = f64::INFINITY;

    for point in points {
        if group_x.is_none_or(|x| x.total_cmp(&point.0) != Ordering::Equal) {
            best_y = best_y.min(group_min);
            group_x = Some(point.0);
            group_min = point.1;
        }
        if point.1 == group_min && point.1 < best_y {
            front.push(point);
        }
    }

    front
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_vector() {
        let points: Vec<(f64, f64, ())> = [
            (1, 5),
            (1, 4),
            (2, 5),
            (2, 4),
            (2, 3),
            (2, 2),
            (3, 1),
            (4, 1),
            (5, 1),
            (5, 2),
        ]
        .into_iter()
        .map(|(x, y)| (f64::from(x), f64::from(y), ()))
        .collect();

        let front: Vec<(f64, f64)> = pareto_front(points)
            .into_iter()
            .map(|(x, y, _)| (x, y))
            .collect();
        assert_eq!(front, vec![(1.0, 4.0), (2.0, 2.0), (3.0, 1.0)]);
    }

    #[test]
    fn test_keeps_payload_and_ties() {
        let front = pareto_front(vec![(2.0, 1.0, "b"), (1.0, 3.0, "a"), (2.0, 1.0, "c")]);
        let names: Vec<&str> = front.iter().map(|(_, _, name)| *name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty() {
        assert!(pareto_front::<()>(Vec::new()).is_empty());
    }
}
