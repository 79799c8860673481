use alphapoly2d::math::{Point, Real};
use alphapoly2d::transformation::{merge_convex, merge_convex_idx, triangulate_polygon};
use alphapoly2d::utils::{is_convex_loop, polygon_area};
use std::collections::HashSet;

fn gear(num_teeth: usize) -> Vec<Point<Real>> {
    (0..num_teeth * 2)
        .map(|i| {
            let angle = i as Real / (num_teeth * 2) as Real * core::f32::consts::TAU as Real;
            let radius = if i % 2 == 0 { 10.0 } else { 6.5 };
            Point::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

#[test]
fn merged_polygons_tile_the_mesh() {
    let hole: Vec<_> = (0..6)
        .map(|i| {
            let angle = i as Real / 6.0 * core::f32::consts::TAU as Real;
            Point::new(angle.cos() * 2.0, angle.sin() * 2.0)
        })
        .collect();
    let outer = gear(9);
    let (vertices, triangles) = triangulate_polygon(&outer, &[hole.clone()]).unwrap();
    let mesh_area = polygon_area(&outer) - polygon_area(&hole);

    for max_vertices in [3, 4, 5, 8, 16] {
        let loops = merge_convex_idx(&vertices, &triangles, max_vertices).unwrap();

        let mut used_vertices = HashSet::new();
        for poly in &loops {
            assert!(poly.len() >= 3 && poly.len() <= max_vertices);
            let points: Vec<_> = poly.iter().map(|i| vertices[*i as usize]).collect();
            assert!(is_convex_loop(&points));
            used_vertices.extend(poly.iter().copied());
        }
        assert_eq!(used_vertices.len(), vertices.len());

        let polygons = merge_convex(&vertices, &triangles, max_vertices).unwrap();
        assert_eq!(polygons.len(), loops.len());
        let area: Real = polygons.iter().map(|poly| poly.area()).sum();
        assert_relative_eq!(area, mesh_area, epsilon = 1.0e-3);

        if max_vertices == 3 {
            assert_eq!(polygons.len(), triangles.len());
        } else {
            assert!(polygons.len() < triangles.len());
        }
    }
}

#[test]
fn convex_input_merges_into_one_polygon() {
    let outer: Vec<_> = (0..8)
        .map(|i| {
            let angle = i as Real / 8.0 * core::f32::consts::TAU as Real;
            Point::new(angle.cos() * 3.0, angle.sin() * 3.0)
        })
        .collect();
    let (vertices, triangles) = triangulate_polygon(&outer, &[]).unwrap();

    let polygons = merge_convex(&vertices, &triangles, 8).unwrap();
    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].points().len(), 8);
    assert_relative_eq!(polygons[0].area(), polygon_area(&outer), epsilon = 1.0e-4);
}
