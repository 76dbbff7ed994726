pub mod aggregation_service;
pub mod locator_service;
pub mod performance_service;
pub mod yield_service;
