pub mod maintenance_routes;

pub use maintenance_routes::create_maintenance_router;
