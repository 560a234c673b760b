use url::Url;

/// Placeholder replaced by the application id in a base url template.
pub const APP_ID_PLACEHOLDER: &str = "{app_id}";

/// Builds a request url from a base template, an api version, a path and query pairs.
///
/// The template may contain [`APP_ID_PLACEHOLDER`], which is substituted with
/// `app_id` before parsing. Query values are percent-encoded.
pub fn target_url<'a, I>(
    base_template: &str,
    app_id: &str,
    version: &str,
    path: &str,
    query: I,
) -> Result<Url, url::ParseError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let base = base_template.replace(APP_ID_PLACEHOLDER, app_id);
    let mut url = Url::parse(base.trim())?;
    url.set_path(&format!("/{}/{}", version, path));

    let mut query = query.into_iter().peekable();
    if query.peek().is_some() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url)
}
