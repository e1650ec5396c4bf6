//! Fetches the family document over HTTP.

use log::info;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::chart::{ChartError, Dataset, Result};

fn js_error(err: JsValue) -> ChartError {
	ChartError::DataLoad(format!("{err:?}"))
}

/// GET `url` and parse it as a family document. Any transport, status or
/// parse problem comes back as [`ChartError::DataLoad`].
pub async fn fetch_dataset(url: &str) -> Result<Dataset> {
	let window = web_sys::window().ok_or_else(|| ChartError::DataLoad("no window".into()))?;
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(js_error)?;
	let response: Response = response
		.dyn_into()
		.map_err(|_| ChartError::DataLoad("fetch did not yield a Response".into()))?;
	if !response.ok() {
		return Err(ChartError::DataLoad(format!(
			"HTTP {} for {url}",
			response.status()
		)));
	}

	let text = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?
		.as_string()
		.ok_or_else(|| ChartError::DataLoad("response body is not text".into()))?;
	let dataset = Dataset::from_json(&text)?;
	info!("loaded {} members from {url}", dataset.len());
	Ok(dataset)
}
