use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthGate, JwtVerifier, TokenVerifier};
use crate::store::{
    AttendanceStore, EventStore, MemoryAttendanceStore, MemoryEventStore, MemoryUserStore,
    UserStore,
};

/// Collaborators shared by every pipeline execution: the record-access
/// seams and the auth gate. No other mutable state is shared between
/// concurrent requests at this layer.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub events: Arc<dyn EventStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub gate: AuthGate,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventStore>,
        attendance: Arc<dyn AttendanceStore>,
        verifier: Arc<dyn TokenVerifier>,
        verify_timeout: Duration,
    ) -> Self {
        Self {
            users,
            events,
            attendance,
            gate: AuthGate::new(verifier, verify_timeout),
        }
    }

    /// In-memory stores with a local JWT verifier. Used by tests and by
    /// `main` when no database is configured.
    pub fn in_memory(secret: &str, verify_timeout: Duration) -> (Self, Arc<MemoryUserStore>, Arc<MemoryEventStore>, Arc<MemoryAttendanceStore>) {
        let users = Arc::new(MemoryUserStore::new());
        let events = Arc::new(MemoryEventStore::new());
        let attendance = Arc::new(MemoryAttendanceStore::new());
        let state = Self::new(
            users.clone(),
            events.clone(),
            attendance.clone(),
            Arc::new(JwtVerifier::new(secret)),
            verify_timeout,
        );
        (state, users, events, attendance)
    }
}
