use alphapoly2d::mask::BitMask;
use alphapoly2d::math::Pixel;
use alphapoly2d::transformation::trace_boundary;

#[test]
fn square_with_center_hole() {
    let mask = BitMask::from_fn(5, 5, |x, y| (x, y) != (2, 2));

    let traced = trace_boundary(&mask, true).unwrap();
    assert_eq!(traced.outer.len(), 16);
    assert_eq!(traced.holes.len(), 1);

    let hole = &traced.holes[0];
    assert_eq!(hole.len(), 8);
    let center = Pixel::new(2, 2);
    for pixel in hole {
        let delta = pixel - center;
        assert!(delta.x.abs() <= 1 && delta.y.abs() <= 1 && *pixel != center);
    }

    let without_holes = trace_boundary(&mask, false).unwrap();
    assert_eq!(without_holes.outer, traced.outer);
    assert!(without_holes.holes.is_empty());
}

#[test]
fn neighboring_holes_get_their_own_loops() {
    let mask = BitMask::from_ascii(
        "
        #########
        #########
        ##..#..##
        ##..#..##
        #########
        #########
        ",
    );

    let traced = trace_boundary(&mask, true).unwrap();
    assert_eq!(traced.holes.len(), 2);

    // Each hole loop stays on one side of the separating column.
    let left = traced.holes.iter().filter(|h| h.iter().all(|p| p.x <= 4));
    let right = traced.holes.iter().filter(|h| h.iter().all(|p| p.x >= 4));
    assert_eq!(left.count(), 1);
    assert_eq!(right.count(), 1);
}
