//! Async sleep usable from components on both targets.

use std::time::Duration;

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    let ms = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

// Without a timer the caller simply never wakes
#[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
pub async fn sleep(_duration: Duration) {
    futures::future::pending::<()>().await;
}
