pub mod aggregation_service;
pub mod billing_calendar;
pub mod subscription_service;
pub mod transfer_service;
