//! WASM-compatible wrapper for slide text parsing.
//!
//! This crate exposes the parser, the prompt builder, and the response
//! envelope to JavaScript for use in Cloudflare Workers. The worker performs
//! the model call itself and hands the reply text to these functions.

use deck_core::{DeckRequest, DeckResponse, ParserConfig, PromptBuilder, Slide};
use deck_markdown::SlideTextParser;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Serialize as plain JS objects (not `Map`s) so column order survives.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| js_error(&format!("Serialization error: {}", e)))
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

/// Read an optional parser config; `undefined` and `null` mean defaults.
fn config_from_js(config: JsValue) -> Result<ParserConfig, JsValue> {
    let config: Option<ParserConfig> = serde_wasm_bindgen::from_value(config)
        .map_err(|e| js_error(&format!("Invalid parser config: {}", e)))?;
    Ok(config.unwrap_or_default())
}

/// Parse a model reply into slides.
///
/// # Arguments
/// * `text` - The raw reply text
/// * `config` - Optional parser configuration object
///
/// # Returns
/// An array of slide objects.
#[wasm_bindgen]
pub fn parse_slides(text: &str, config: JsValue) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    to_js(&parse_slides_impl(text, config))
}

fn parse_slides_impl(text: &str, config: ParserConfig) -> Vec<Slide> {
    SlideTextParser::new(config).parse(text)
}

/// Build the generation prompt for a `{topic, slidesCount}` request.
///
/// Throws if the request is malformed or out of range.
#[wasm_bindgen]
pub fn build_prompt(request: JsValue, config: JsValue) -> Result<String, JsValue> {
    let request: DeckRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| js_error(&format!("Invalid request: {}", e)))?;
    let config = config_from_js(config)?;

    build_prompt_impl(&request, &config).map_err(|e| js_error(&e))
}

fn build_prompt_impl(request: &DeckRequest, config: &ParserConfig) -> Result<String, String> {
    request.validate().map_err(|e| e.to_string())?;
    Ok(PromptBuilder::new().with_blocks(config.blocks).build(request))
}

/// Wrap a model reply in the `{success, slides}` / `{success, error}` body.
///
/// A missing or blank reply produces the failure envelope.
#[wasm_bindgen]
pub fn respond_with_slides(text: Option<String>, config: JsValue) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    to_js(&respond_impl(text.as_deref(), config))
}

fn respond_impl(text: Option<&str>, config: ParserConfig) -> DeckResponse {
    DeckResponse::from_generated(text, |text| parse_slides_impl(text, config))
}
