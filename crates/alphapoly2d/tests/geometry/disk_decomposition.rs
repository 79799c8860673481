use alphapoly2d::mask::{BitMask, FnMask};
use alphapoly2d::math::Real;
use alphapoly2d::pipeline::{decompose, DecompositionError, DecompositionParameters, Stage};
use alphapoly2d::shape::ConvexPolygon;
use alphapoly2d::transformation::Simplifier;
use alphapoly2d::utils::is_convex_loop;
use core::f64::consts::PI;

fn ellipse(width: u32, height: u32, center: [f64; 2], radii: [f64; 2]) -> BitMask {
    BitMask::from_fn(width, height, |x, y| {
        let dx = (x as f64 + 0.5 - center[0]) / radii[0];
        let dy = (y as f64 + 0.5 - center[1]) / radii[1];
        dx * dx + dy * dy <= 1.0
    })
}

fn check_polygons(polygons: &[ConvexPolygon], max_vertices: usize) -> f64 {
    assert!(!polygons.is_empty());

    for poly in polygons {
        assert!(poly.points().len() >= 3 && poly.points().len() <= max_vertices);
        assert!(is_convex_loop(poly.points()));
        assert!(poly.area() > 0.0);
    }

    polygons.iter().map(|poly| poly.area() as f64).sum()
}

#[test]
fn disk_end_to_end() {
    let radius = 10.0;
    let mask = ellipse(24, 24, [12.0, 12.0], [radius, radius]);

    for simplifier in Simplifier::ALL {
        // Averaged loops are smooth, so they accumulate curvature slowly.
        let tolerance = match simplifier {
            Simplifier::WindowAverage => 0.01,
            _ => 1.0,
        };
        let params = DecompositionParameters {
            simplifier,
            tolerance,
            ..DecompositionParameters::default()
        };
        let polygons = decompose(&mask, &params).unwrap();
        let area = check_polygons(&polygons, params.max_polygon_vertices);

        // The loop runs through the centers of the boundary pixels.
        assert!(area > PI * (radius - 4.0) * (radius - 4.0), "{simplifier}: {area}");
        assert!(area < PI * radius * radius, "{simplifier}: {area}");
    }
}

#[test]
fn pixel_perfect_disk_is_larger() {
    let radius = 10.0;
    let mask = ellipse(24, 24, [12.0, 12.0], [radius, radius]);
    let centered = DecompositionParameters::default();
    let perfect = DecompositionParameters {
        pixel_perfect: true,
        ..centered
    };

    let centered_area = check_polygons(&decompose(&mask, &centered).unwrap(), 8);
    let perfect_area = check_polygons(&decompose(&mask, &perfect).unwrap(), 8);

    // The corners of the opaque pixels lie within half a diagonal of the circle.
    assert!(perfect_area > centered_area, "{perfect_area} <= {centered_area}");
    assert!(perfect_area < PI * (radius + 1.0) * (radius + 1.0), "{perfect_area}");
}

#[test]
fn annulus_end_to_end() {
    let (outer_radius, inner_radius) = (14.0, 5.0);
    let mask = FnMask::new(32, 32, |x, y| {
        let dx = x as f64 + 0.5 - 16.0;
        let dy = y as f64 + 0.5 - 16.0;
        let dist2 = dx * dx + dy * dy;
        dist2 <= outer_radius * outer_radius && dist2 > inner_radius * inner_radius
    });

    for max_polygon_vertices in [3, 4, 8, 12] {
        let params = DecompositionParameters {
            max_polygon_vertices,
            ..DecompositionParameters::default()
        };
        let polygons = decompose(&mask, &params).unwrap();
        let area = check_polygons(&polygons, max_polygon_vertices);

        let min_area = PI * ((outer_radius - 4.0).powi(2) - (inner_radius + 1.5).powi(2));
        let max_area = PI * (outer_radius.powi(2) - (inner_radius - 1.5).powi(2));
        assert!(area > min_area && area < max_area, "{area}");

        // Nothing covers the hole.
        let center = alphapoly2d::math::Point::new(16.0 as Real, 16.0 as Real);
        assert!(polygons.iter().all(|poly| !poly.contains_local_point(&center)));
    }
}

#[test]
fn random_ellipses() {
    let mut rng = oorandom::Rand32::new(42);
    let mut num_decomposed = 0;

    for _ in 0..12 {
        let rx = 7.0 + rng.rand_float() as f64 * 9.0;
        let ry = rx * (0.75 + rng.rand_float() as f64 * 0.5);
        let center = [
            28.0 + rng.rand_float() as f64 * 8.0,
            28.0 + rng.rand_float() as f64 * 8.0,
        ];
        let mask = ellipse(64, 64, center, [rx, ry]);

        match decompose(&mask, &DecompositionParameters::default()) {
            Ok(polygons) => {
                let area = check_polygons(&polygons, 8);
                assert!(area > PI * (rx - 4.0) * (ry - 4.0));
                assert!(area < PI * rx * ry);
                num_decomposed += 1;
            }
            // Pixel-thin tips are an input problem, never a triangulation bug.
            Err(err) => assert!(err.is_recoverable(), "{err}"),
        }
    }

    assert!(num_decomposed > 0);
}

#[test]
fn tiny_shapes_are_rejected() {
    let mask = BitMask::from_fn(2, 2, |_, _| true);
    let err = decompose(&mask, &DecompositionParameters::default()).unwrap_err();
    assert_eq!(
        err,
        DecompositionError::InsufficientVertices {
            stage: Stage::Simplify,
            count: 2
        }
    );
    assert!(err.is_recoverable());
}
