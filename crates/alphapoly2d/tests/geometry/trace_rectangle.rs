use alphapoly2d::mask::BitMask;
use alphapoly2d::math::Pixel;
use alphapoly2d::transformation::trace_boundary;

fn assert_closed_chain(pixels: &[Pixel]) {
    for (i, a) in pixels.iter().enumerate() {
        let b = pixels[(i + 1) % pixels.len()];
        let step = b - a;
        assert!(
            step.x.abs() <= 1 && step.y.abs() <= 1 && (step.x, step.y) != (0, 0),
            "{a:?} and {b:?} are not neighbors"
        );
    }
}

#[test]
fn rectangle_loop_length() {
    for (n, m) in [(3, 3), (3, 8), (7, 4), (16, 11)] {
        let mask = BitMask::from_fn(n, m, |_, _| true);
        let traced = trace_boundary(&mask, false).unwrap();

        assert_eq!(traced.outer.len(), 2 * (n as usize + m as usize - 2));
        assert!(traced.holes.is_empty());
        assert_closed_chain(&traced.outer);
    }
}

#[test]
fn rectangle_inside_a_larger_image() {
    let mask = BitMask::from_fn(20, 20, |x, y| (4..10).contains(&x) && (7..12).contains(&y));
    let traced = trace_boundary(&mask, true).unwrap();

    assert_eq!(traced.outer.len(), 2 * (6 + 5 - 2));
    assert!(traced.holes.is_empty());
    assert_eq!(traced.outer[0], Pixel::new(4, 7));
    assert!(traced
        .outer
        .iter()
        .all(|p| p.x == 4 || p.x == 9 || p.y == 7 || p.y == 11));
}
