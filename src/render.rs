//! Server-side rendering of the form page

use crate::error::Result;
use crate::model::{self, Prediction};
use minijinja::{Environment, context};
use once_cell::sync::Lazy;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("../templates/index.html"))
        .expect("bundled index template should parse");
    env
});

/// Render the form page, with the result block present only when a
/// prediction is being displayed.
pub fn render_index(features: &[String], prediction: Option<&Prediction>) -> Result<String> {
    let tmpl = TEMPLATES.get_template("index.html")?;
    let html = tmpl.render(context! {
        features => features,
        result => prediction.map(|p| p.label()),
        probability => prediction.map(|p| model::round_probability(p.probability)),
    })?;
    Ok(html)
}
