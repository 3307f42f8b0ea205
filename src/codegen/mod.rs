pub mod artifact;
pub mod method_scan;
pub mod page_object;
pub mod paths;
pub mod python;
pub mod role;
pub mod scenario_mapper;
pub mod task;
pub mod test_template;
