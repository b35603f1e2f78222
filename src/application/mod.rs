//! Application layer containing the business logic orchestration.
//!
//! Handlers build a fresh [`validator::OrderValidator`] per request, and only
//! hand a request to [`order_service::OrderService`] once it validates.

pub mod order_service;
pub mod product_service;
pub mod validator;
