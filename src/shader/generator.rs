//! Shader Source Generator
//!
//! Assembles final GLSL from a family's template pair plus a variant key.
//! Templates are embedded in the binary and rendered through minijinja; the
//! variant key contributes both a textual `#define` flag block (prepended so
//! generated sources diff cleanly) and per-feature template variables used by
//! `{% if USE_* %}` blocks.
//!
//! Determinism contract: identical [`FeatureSet`]s must always produce
//! byte-identical source. The flag block and the define map are both emitted
//! in the fixed feature order, so this holds regardless of how the key was
//! constructed.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use minijinja::{Environment, Error, ErrorKind};
use rust_embed::RustEmbed;
use serde::Serialize;

use super::features::FeatureSet;
use crate::errors::{RenderError, Result};

static SHADER_ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(RustEmbed)]
#[folder = "src/shader/templates"]
struct TemplateAssets;

fn get_env() -> &'static Environment<'static> {
    SHADER_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_loader(template_loader);
        env
    })
}

fn template_loader(name: &str) -> std::result::Result<Option<String>, Error> {
    let Some(file) = TemplateAssets::get(name) else {
        return Ok(None);
    };
    match std::str::from_utf8(file.data.as_ref()) {
        Ok(source) => Ok(Some(source.to_string())),
        Err(e) => Err(Error::new(
            ErrorKind::SyntaxError,
            format!("Template '{name}' is not valid UTF-8: {e}"),
        )),
    }
}

/// The two template stages owned by one shader family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Template file extension for the stage.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert",
            ShaderStage::Fragment => "frag",
        }
    }
}

#[derive(Serialize)]
struct TemplateContext {
    /// Flattened so templates can test `{% if USE_NORMAL_MAP %}` directly.
    #[serde(flatten)]
    defines: BTreeMap<String, String>,
    /// The textual `#define` prelude, emitted verbatim near the top.
    feature_flags: String,
}

/// Stateless source assembler for shader variants.
pub struct ShaderGenerator;

impl ShaderGenerator {
    /// Renders the `#define` flag block for a variant key.
    ///
    /// Features are emitted in the fixed ascending-bit order; the result is
    /// byte-identical for logically equal keys.
    #[must_use]
    pub fn flag_block(key: FeatureSet) -> String {
        let mut block = String::new();
        for feature in key.features() {
            block.push_str("#define ");
            block.push_str(feature.define());
            block.push('\n');
        }
        block
    }

    /// Generates final source for one stage of `family` with `key` applied.
    pub fn generate(family: &str, stage: ShaderStage, key: FeatureSet) -> Result<String> {
        let env = get_env();
        let template_name = format!("{family}.{}", stage.suffix());

        let mut defines = BTreeMap::new();
        for feature in key.features() {
            defines.insert(feature.define().to_string(), "1".to_string());
        }

        let ctx = TemplateContext {
            defines,
            feature_flags: Self::flag_block(key),
        };

        let template = env
            .get_template(&template_name)
            .map_err(|e| RenderError::ShaderCompile {
                family: family.to_string(),
                message: format!("template '{template_name}' not found: {e}"),
            })?;

        template.render(&ctx).map_err(|e| RenderError::ShaderCompile {
            family: family.to_string(),
            message: format!("template '{template_name}' render failed: {e}"),
        })
    }

    /// Generates the vertex/fragment source pair for a variant.
    pub fn generate_pair(family: &str, key: FeatureSet) -> Result<(String, String)> {
        let vertex = Self::generate(family, ShaderStage::Vertex, key)?;
        let fragment = Self::generate(family, ShaderStage::Fragment, key)?;
        Ok((vertex, fragment))
    }
}
