mod storage;

use serde::Serialize;
use storefront_core::cart::{CartStorage, MemoryStorage};
use storefront_core::{
    CartError, CartStore, CartUpdate, Catalog, DepthEngine, ScrollThrottle, StorefrontConfig,
    TierFilter,
};
use wasm_bindgen::prelude::*;

pub use storage::LocalStorage;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn parse_config(config_json: Option<&str>) -> Result<StorefrontConfig, JsError> {
    match config_json {
        Some(json) => StorefrontConfig::from_json(json).map_err(|e| JsError::new(&e.to_string())),
        None => Ok(StorefrontConfig::default()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

/// The parallax hero. The page owns the scroll listener and the
/// `requestAnimationFrame` loop:
///
/// ```js
/// if (scene.notify_scroll(window.scrollY)) {
///   requestAnimationFrame(() => apply(JSON.parse(scene.frame())));
/// }
/// ```
#[wasm_bindgen]
pub struct ScrollScene {
    engine: DepthEngine,
    throttle: ScrollThrottle,
}

#[wasm_bindgen]
impl ScrollScene {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ScrollScene, JsError> {
        let config = parse_config(config_json.as_deref())?;
        let engine = DepthEngine::new(config.depth).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self {
            engine,
            throttle: ScrollThrottle::new(),
        })
    }

    /// Position the layers; returns the scroll track height in pixels.
    pub fn initialize(&mut self, layer_count: usize, viewport_height: f64) -> f64 {
        self.engine.initialize(layer_count, viewport_height)
    }

    /// Evaluate the scene immediately, bypassing the throttle.
    pub fn on_scroll(&self, offset: f64) -> Result<String, JsError> {
        to_json(&self.engine.on_scroll(offset))
    }

    /// Record a scroll event. Returns `true` when the page should request an
    /// animation frame.
    pub fn notify_scroll(&mut self, offset: f64) -> bool {
        self.throttle.notify(offset)
    }

    /// Frame callback: the depth frame for the latest offset, or `undefined`
    /// when nothing changed since the previous frame.
    pub fn frame(&mut self) -> Result<Option<String>, JsError> {
        self.throttle
            .take()
            .map(|offset| to_json(&self.engine.on_scroll(offset)))
            .transpose()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartResponse {
    ok: bool,
    item_count: u32,
    capped: bool,
    notice: Option<String>,
    error: Option<String>,
}

impl CartResponse {
    fn from_result(result: Result<CartUpdate, CartError>, item_count: u32) -> Self {
        match result {
            Ok(update) => {
                if let Some(notice) = &update.notice {
                    web_sys::console::warn_1(&notice.message.as_str().into());
                }
                Self {
                    ok: true,
                    item_count: update.item_count,
                    capped: update.capped,
                    notice: update.notice.map(|n| n.message),
                    error: None,
                }
            }
            Err(e) => Self {
                ok: false,
                item_count,
                capped: false,
                notice: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Catalog views and the cart for one page.
///
/// Cart operations never throw for bad input: they return a JSON response
/// with `ok: false` and an `error` message instead.
#[wasm_bindgen]
pub struct Storefront {
    catalog: Catalog,
    cart: CartStore<Box<dyn CartStorage>>,
}

#[wasm_bindgen]
impl Storefront {
    /// `catalog_json` replaces the bundled catalog when given.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        catalog_json: Option<String>,
    ) -> Result<Storefront, JsError> {
        let config = parse_config(config_json.as_deref())?;
        let catalog = match catalog_json {
            Some(json) => Catalog::from_json(&json),
            None => Catalog::builtin(),
        }
        .map_err(|e| JsError::new(&e.to_string()))?;

        let storage: Box<dyn CartStorage> = match LocalStorage::open() {
            Some(local) => Box::new(local),
            None => {
                web_sys::console::warn_1(
                    &"storefront: localStorage unavailable, cart will not persist".into(),
                );
                Box::new(MemoryStorage::new())
            }
        };

        let cart =
            CartStore::new(storage, config.cart).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { catalog, cart })
    }

    /// Grid cards for a page path (`collections.html`, `essentials.html`, ...).
    pub fn cards_for_page(&self, path: &str) -> Result<String, JsError> {
        to_json(&self.catalog.cards(TierFilter::from_page_path(path)))
    }

    /// Grid cards for an explicit filter: `all`, `signature` or `essentials`.
    pub fn cards(&self, filter: &str) -> Result<String, JsError> {
        let filter: TierFilter = filter.parse().map_err(|e: storefront_core::CatalogError| {
            JsError::new(&e.to_string())
        })?;
        to_json(&self.catalog.cards(filter))
    }

    /// Detail page model, or `undefined` for an unknown id.
    pub fn detail(&self, id: &str) -> Result<Option<String>, JsError> {
        self.catalog.detail(id).map(|d| to_json(&d)).transpose()
    }

    /// Add to cart; `quantity` defaults to 1.
    pub fn add(
        &mut self,
        product_id: &str,
        variant: &str,
        quantity: Option<u32>,
    ) -> Result<String, JsError> {
        let result = self.cart.add(product_id, variant, quantity.unwrap_or(1));
        to_json(&CartResponse::from_result(result, self.cart.item_count()))
    }

    pub fn update_quantity(&mut self, index: usize, delta: i32) -> Result<String, JsError> {
        let result = self.cart.update_quantity(index, delta);
        to_json(&CartResponse::from_result(result, self.cart.item_count()))
    }

    pub fn remove(&mut self, index: usize) -> Result<String, JsError> {
        let result = self.cart.remove(index);
        to_json(&CartResponse::from_result(result, self.cart.item_count()))
    }

    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Cart total in currency units, rounded to cents.
    pub fn total(&self) -> f64 {
        self.cart.compute_total(&self.catalog).as_decimal()
    }

    /// Rows, badge count and total for the cart page.
    pub fn cart_summary(&self) -> Result<String, JsError> {
        to_json(&self.cart.summary(&self.catalog))
    }

    /// Re-read the cart, e.g. after another tab changed it.
    pub fn reload(&mut self) -> u32 {
        self.cart.load();
        self.cart.item_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_operation_reports_error_and_current_count() {
        let response = CartResponse::from_result(
            Err(CartError::IndexOutOfRange { index: 4, len: 2 }),
            3,
        );
        assert!(!response.ok);
        assert_eq!(response.item_count, 3);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""itemCount":3"#));
        assert!(json.contains("no cart item at index 4"));
    }
}
