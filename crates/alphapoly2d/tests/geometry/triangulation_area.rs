use alphapoly2d::math::{Point, Real};
use alphapoly2d::na::Point2;
use alphapoly2d::transformation::{triangulate, triangulate_polygon, TriangulationError};
use alphapoly2d::utils::{polygon_area, SortedPair};
use std::collections::HashMap;

fn triangles_area(vertices: &[Point<Real>], triangles: &[[u32; 3]]) -> f64 {
    triangles
        .iter()
        .map(|[a, b, c]| {
            let a = vertices[*a as usize].cast::<f64>();
            let b = vertices[*b as usize].cast::<f64>();
            let c = vertices[*c as usize].cast::<f64>();
            let doubled = (b - a).perp(&(c - a));
            assert!(doubled > 0.0, "triangles must be counter-clockwise");
            doubled / 2.0
        })
        .sum()
}

/// Every interior edge is shared by exactly two triangles, every boundary edge by one.
fn assert_manifold(triangles: &[[u32; 3]]) {
    let mut uses = HashMap::new();
    for tri in triangles {
        for k in 0..3 {
            *uses
                .entry(SortedPair::new(tri[k], tri[(k + 1) % 3]))
                .or_insert(0) += 1;
        }
    }
    assert!(uses.values().all(|n| *n == 1 || *n == 2));
}

fn random_star(rng: &mut oorandom::Rand32, num_vertices: usize) -> Vec<Point<Real>> {
    (0..num_vertices)
        .map(|i| {
            let angle = i as Real / num_vertices as Real * core::f32::consts::TAU as Real;
            let radius = 3.0 + rng.rand_float() as Real * 5.0;
            Point::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

#[test]
fn random_star_polygons() {
    let mut rng = oorandom::Rand32::new(7);

    for num_vertices in [5, 8, 13, 32, 100] {
        let outer = random_star(&mut rng, num_vertices);
        let (vertices, triangles) = triangulate_polygon(&outer, &[]).unwrap();

        assert_eq!(triangles.len(), num_vertices - 2);
        assert_manifold(&triangles);
        assert_relative_eq!(
            triangles_area(&vertices, &triangles),
            polygon_area(&outer) as f64,
            epsilon = 1.0e-3
        );
    }
}

#[test]
fn random_star_polygons_with_a_hole() {
    let mut rng = oorandom::Rand32::new(11);

    for num_vertices in [8, 21, 64] {
        let outer = random_star(&mut rng, num_vertices);
        // Clockwise square, well inside the star.
        let hole = vec![
            Point::new(-1.0, -1.0),
            Point::new(-1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, -1.0),
        ];
        let (vertices, triangles) = triangulate_polygon(&outer, &[hole]).unwrap();

        assert_eq!(triangles.len(), num_vertices + 4);
        assert_manifold(&triangles);
        assert_relative_eq!(
            triangles_area(&vertices, &triangles),
            polygon_area(&outer) as f64 - 4.0,
            epsilon = 1.0e-3
        );
    }
}

#[test]
fn comb_polygon() {
    // A comb with teeth pointing up, made of axis-aligned edges only.
    let mut outer = vec![Point::new(0.0, 0.0), Point::new(9.0, 0.0)];
    for tooth in (0..5).rev() {
        let x = tooth as Real * 2.0;
        outer.push(Point::new(x + 1.0, 4.0));
        outer.push(Point::new(x, 4.0));
        if tooth > 0 {
            outer.push(Point::new(x, 1.0));
            outer.push(Point::new(x - 1.0, 1.0));
        }
    }

    let (vertices, triangles) = triangulate_polygon(&outer, &[]).unwrap();
    assert_eq!(outer.len(), 20);
    assert_eq!(triangles.len(), outer.len() - 2);
    assert_relative_eq!(triangles_area(&vertices, &triangles), 24.0, epsilon = 1.0e-4);
    assert_relative_eq!(
        triangles_area(&vertices, &triangles),
        polygon_area(&outer) as f64,
        epsilon = 1.0e-4
    );
}

#[test]
fn too_few_vertices() {
    let two = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
    assert_eq!(
        triangulate(&two, &[[0, 1]]),
        Err(TriangulationError::InsufficientVertices(2))
    );
    assert_eq!(
        triangulate(&[], &[]),
        Err(TriangulationError::InsufficientVertices(0))
    );

    let line = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
    assert_eq!(
        triangulate_polygon(&line, &[]),
        Err(TriangulationError::InsufficientVertices(2))
    );
}
