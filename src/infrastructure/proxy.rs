//! Fallback path through the backend actor's proxy methods.

use crate::domain::errors::{NetworkError, SourceError};
use crate::domain::market_data::payload::parse_json;
use crate::domain::market_data::repositories::{BackendActor, MarketDataSource};
use crate::domain::market_data::Granularity;
use js_sys::{Function, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Adapts a [`BackendActor`] to the [`MarketDataSource`] contract.
///
/// The actor fixes interval and limit server-side, so `klines` ignores the
/// requested granularity and count.
#[derive(Debug, Clone)]
pub struct ProxySource<A> {
    actor: A,
}

impl<A: BackendActor> ProxySource<A> {
    pub fn new(actor: A) -> Self {
        Self { actor }
    }
}

impl<A: BackendActor> MarketDataSource for ProxySource<A> {
    fn name(&self) -> &'static str {
        "backend-proxy"
    }

    async fn ticker(&self) -> Result<Value, SourceError> {
        let text = self.actor.proxy_icp_price().await?;
        Ok(parse_json(&text)?)
    }

    async fn klines(&self, _granularity: Granularity, _limit: usize) -> Result<Value, SourceError> {
        let text = self.actor.proxy_icp_klines().await?;
        Ok(parse_json(&text)?)
    }
}

/// Backend actor handle created by the page script (e.g. an agent-js actor).
/// Any object exposing `proxyIcpPrice()` and `proxyIcpKlines()` returning
/// promises of strings will do.
#[derive(Debug, Clone)]
pub struct JsBackendActor {
    actor: JsValue,
}

impl JsBackendActor {
    pub fn new(actor: JsValue) -> Self {
        Self { actor }
    }

    async fn call(&self, method: &str) -> Result<String, NetworkError> {
        let rpc_error = |detail: String| NetworkError::Rpc(format!("{method}: {detail}"));

        let function: Function = Reflect::get(&self.actor, &JsValue::from_str(method))
            .ok()
            .and_then(|value| value.dyn_into().ok())
            .ok_or_else(|| rpc_error("not a function".to_string()))?;

        let returned = function.call0(&self.actor).map_err(|e| rpc_error(format!("{e:?}")))?;
        let settled = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|e| rpc_error(format!("{e:?}")))?;

        settled.as_string().ok_or_else(|| rpc_error("did not return a string".to_string()))
    }
}

impl BackendActor for JsBackendActor {
    async fn proxy_icp_price(&self) -> Result<String, NetworkError> {
        self.call("proxyIcpPrice").await
    }

    async fn proxy_icp_klines(&self) -> Result<String, NetworkError> {
        self.call("proxyIcpKlines").await
    }
}
