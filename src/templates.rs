use handlebars::Handlebars;
use rust_embed::RustEmbed;

/// Page and email templates embedded into the binary.
#[derive(RustEmbed)]
#[folder = "assets/templates/"]
struct Templates;

/// Creates a new Handlebars registry with all embedded templates, every template is also available
/// as a partial under the same name.
pub fn create_templates() -> anyhow::Result<Handlebars<'static>> {
    let mut templates = Handlebars::new();
    templates.register_embed_templates_with_extension::<Templates>(".hbs")?;

    Ok(templates)
}
