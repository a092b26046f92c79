// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use async_stream::stream;
use futures_util::future::pending;

use crate::PinnedInputStream;

/// Yield every item in `generator_vec`, then end the stream.
#[must_use]
pub fn gen_input_stream<T>(generator_vec: Vec<T>) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            yield item;
        }
    };
    Box::pin(it)
}

/// Same as [`gen_input_stream`], but sleep for `delay` before each item.
#[must_use]
pub fn gen_input_stream_with_delay<T>(
    generator_vec: Vec<T>,
    delay: Duration,
) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            tokio::time::sleep(delay).await;
            yield item;
        }
    };
    Box::pin(it)
}

/// Yield every item in `generator_vec`, then never yield again and never end. This is
/// what a real keyboard looks like when the user stops typing.
#[must_use]
pub fn gen_input_stream_then_pending<T>(generator_vec: Vec<T>) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            yield item;
        }
        pending::<()>().await;
    };
    Box::pin(it)
}
