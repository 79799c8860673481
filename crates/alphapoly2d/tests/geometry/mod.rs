mod cancellation;
mod convex_merge_properties;
mod disk_decomposition;
mod simplify_idempotence;
mod trace_holes;
mod trace_rectangle;
mod triangulation_area;
