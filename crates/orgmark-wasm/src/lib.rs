use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn to_html(input: &str, standalone: Option<bool>) -> String {
    let cfg = orgmark::Config {
        standalone,
        ..orgmark::Config::default()
    };
    orgmark::convert(input, &cfg)
}

#[wasm_bindgen]
pub fn to_text(input: &str, line_width: Option<usize>) -> String {
    let cfg = orgmark::Config {
        format: Some(orgmark::OutputFormat::Text),
        line_width,
        ..orgmark::Config::default()
    };
    orgmark::convert(input, &cfg)
}

// Structural outline of the parsed tree, for debugging in the browser.
#[wasm_bindgen]
pub fn parse_debug(input: &str) -> String {
    orgmark::parse(input).dump()
}
