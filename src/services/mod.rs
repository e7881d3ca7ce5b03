//! Services module
//!
//! Este módulo contiene la lógica de negocio del servicio de mantenimiento.
//! Las piezas puras (transiciones, costos, repuestos, reportes) no hacen I/O;
//! `MaintenanceService` las compone con el store y el registro de vehículos.

pub mod cost_calculator;
pub mod maintenance_service;
pub mod report_builder;
pub mod spare_part_ledger;
pub mod status_transition;
pub mod vehicle_sync;

pub use maintenance_service::MaintenanceService;
pub use status_transition::{SideEffect, StatusTransitionEngine, Transition};
pub use vehicle_sync::VehicleSync;
