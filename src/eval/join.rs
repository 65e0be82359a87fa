//! A tiny, dependency-free `join_all` over same-lifetime boxed futures,
//! used to evaluate non-short-circuit call arguments concurrently in the
//! async evaluator (spec.md §4.5: "arguments to a non-`if` call are
//! evaluated in parallel"). Bounded to `T: Unpin` (every `T` used here is
//! an owned `Result`), so no `unsafe` is needed to poll through `Pin<&mut Self>`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::callable::BoxFuture;

pub struct JoinAll<'a, T> {
    futures: Vec<Option<BoxFuture<'a, T>>>,
    results: Vec<Option<T>>,
}

pub fn join_all<'a, T>(futures: Vec<BoxFuture<'a, T>>) -> JoinAll<'a, T> {
    let len = futures.len();
    JoinAll {
        futures: futures.into_iter().map(Some).collect(),
        results: (0..len).map(|_| None).collect(),
    }
}

impl<'a, T: Unpin> Future for JoinAll<'a, T> {
    type Output = Vec<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut all_ready = true;
        for i in 0..this.futures.len() {
            if this.results[i].is_some() {
                continue;
            }
            if let Some(fut) = this.futures[i].as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(v) => {
                        this.results[i] = Some(v);
                        this.futures[i] = None;
                    }
                    Poll::Pending => all_ready = false,
                }
            }
        }
        if all_ready {
            Poll::Ready(this.results.iter_mut().map(|r| r.take().unwrap()).collect())
        } else {
            Poll::Pending
        }
    }
}
