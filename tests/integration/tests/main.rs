//! End-to-end reconciliation tests.
//!
//! These tests run the reconciler against a wiremock server that mimics the
//! Keycloak token endpoint and admin REST API.

mod reconcile;
