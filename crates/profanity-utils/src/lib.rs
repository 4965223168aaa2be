// profanity-utils
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub mod id_string_macro;

// Profanity is a native console client; there is no wasm32 target to accommodate, so these
// traits collapse to their native bounds directly rather than branching on target_arch.
pub trait SendUnlessWasm: Send {}
impl<T: Send> SendUnlessWasm for T {}

pub trait SyncUnlessWasm: Sync {}
impl<T: Sync> SyncUnlessWasm for T {}

pub type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pub fn spawn<T>(future: T)
where
    T: Future + SendUnlessWasm + 'static,
    T::Output: SendUnlessWasm,
{
    tokio::spawn(future);
}

pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}
