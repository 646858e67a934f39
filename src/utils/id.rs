use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Time-based client id: the current epoch millisecond, bumped past the previously issued id so
/// two ids taken within the same millisecond never collide.
pub fn next_client_id() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut current = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(current + 1);
        match LAST_ID.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => current = actual,
        }
    }
}

pub fn next_notification_id() -> String {
    next_client_id().to_string()
}
