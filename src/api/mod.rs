//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and OpenAPI document
//!
//! # API Endpoints
//!
//! ## Research
//! - `POST /research` - Research a company, returns the JSON report
//! - `POST /research/markdown` - Same research, rendered as `text/markdown`
//!
//! ## Health
//! - `GET /` - Liveness check
//! - `GET /health` - Component and configuration status
//!
//! # Errors
//!
//! Failures are returned as `{"error": "...", "kind": "..."}` with the status
//! code of the [`AppError`](crate::types::AppError) variant.
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`. When the
//! `swagger-ui` feature is enabled, interactive documentation is available
//! at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
