use anyhow::Result;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::hierarchy::{Hierarchy, StateAggregate};
use crate::sanitize::StoreRecord;
use crate::views::{CityView, HomeView, SearchResults, SiteContext, SitemapEntry, StateView};

const SITE_NAME: &str = "Consignment Store Directory";
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

fn layout(title: &str, ctx: &SiteContext, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{} | {}</title>\n", escape(title), SITE_NAME));
    html.push_str("</head>\n<body>\n<header>\n");
    html.push_str(&format!("<a href=\"/\">{}</a>\n", SITE_NAME));
    html.push_str(
        "<form action=\"/search\" method=\"get\">\
         <input type=\"search\" name=\"q\" placeholder=\"Search stores, cities, states\">\
         <button>Search</button></form>\n",
    );
    html.push_str("</header>\n<main>\n");
    html.push_str(body);
    html.push_str("</main>\n<footer>\n");
    if !ctx.popular_cities.is_empty() {
        html.push_str("<h2>Popular cities</h2>\n<ul>\n");
        for c in &ctx.popular_cities {
            html.push_str(&format!(
                "<li><a href=\"/state/{}/{}\">{}, {}</a> ({})</li>\n",
                c.state_slug,
                c.city_slug,
                escape(&c.name),
                escape(&c.state),
                c.store_count
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str(&format!(
        "<p>{} stores in {} cities across {} states</p>\n",
        ctx.total_stores, ctx.total_cities, ctx.total_states
    ));
    html.push_str(&format!(
        "<p>&copy; {} {} &middot; <a href=\"/about\">About</a> &middot; \
         <a href=\"/sitemap\">Sitemap</a></p>\n",
        ctx.current_year, SITE_NAME
    ));
    html.push_str("</footer>\n</body>\n</html>\n");
    html
}

fn no_data() -> &'static str {
    "<p class=\"no-data\">No store data is available right now. Please check back soon.</p>\n"
}

pub fn home_page(ctx: &SiteContext, view: &HomeView) -> String {
    let mut body = String::from("<h1>Find consignment stores near you</h1>\n");
    if view.regions.is_empty() {
        body.push_str(no_data());
    }
    for region in &view.regions {
        body.push_str(&format!("<section>\n<h2>{}</h2>\n<ul>\n", escape(region.name)));
        for s in &region.states {
            body.push_str(&format!(
                "<li><a href=\"/state/{}\">{}</a> {} stores in {} cities</li>\n",
                s.slug,
                escape(&s.name),
                s.store_count,
                s.city_count
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }
    layout("Home", ctx, &body)
}

pub fn state_page(ctx: &SiteContext, view: &StateView) -> String {
    let state = view.state;
    let mut body = format!(
        "<h1>Consignment stores in {}</h1>\n<p>{} stores in {} cities, {} reviews</p>\n<ul>\n",
        escape(&state.name),
        state.store_count,
        state.city_count,
        state.total_reviews
    );
    for city in view.cities {
        body.push_str(&format!(
            "<li><a href=\"/state/{}/{}\">{}</a> ({} stores)</li>\n",
            state.slug,
            city.slug,
            escape(&city.name),
            city.store_count
        ));
    }
    body.push_str("</ul>\n");
    layout(&state.name, ctx, &body)
}

fn store_card(store: &StoreRecord) -> String {
    let mut card = String::from("<article class=\"store\">\n");
    if let Some(photo) = &store.photo {
        card.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
            escape(photo),
            escape(&store.name)
        ));
    }
    card.push_str(&format!(
        "<h2 id=\"{}\">{}</h2>\n<p>{} &middot; {:.1} stars ({} reviews)</p>\n",
        store.slug,
        escape(&store.name),
        escape(&store.address),
        store.rating,
        store.review_count
    ));
    for para in &store.description_paragraphs {
        card.push_str(&format!("<p>{}</p>\n", escape(para)));
    }
    if !store.categories.is_empty() {
        let categories: Vec<_> = store.categories.iter().map(|c| escape(c)).collect();
        card.push_str(&format!("<p class=\"categories\">{}</p>\n", categories.join(", ")));
    }
    if let Some(hours) = &store.hours {
        card.push_str(&format!("<p>Hours: {}</p>\n", escape(hours)));
    }
    if let Some(phone) = &store.phone {
        card.push_str(&format!("<p>Phone: {}</p>\n", escape(phone)));
    }
    if let Some(site) = &store.website {
        card.push_str(&format!(
            "<p><a href=\"{}\" rel=\"nofollow noopener\">Website</a></p>\n",
            escape(site)
        ));
    }
    card.push_str("</article>\n");
    card
}

pub fn city_page(ctx: &SiteContext, view: &CityView) -> String {
    let (state, city) = (view.state, view.city);
    let mut body = format!(
        "<p><a href=\"/state/{}\">{}</a></p>\n<h1>Consignment stores in {}, {}</h1>\n",
        state.slug,
        escape(&state.name),
        escape(&city.name),
        escape(&state.name)
    );
    for store in &city.stores {
        body.push_str(&store_card(store));
    }
    if !view.nearby.is_empty() {
        body.push_str("<h2>Nearby cities</h2>\n<ul>\n");
        for c in &view.nearby {
            body.push_str(&format!(
                "<li><a href=\"/state/{}/{}\">{}</a> ({} stores)</li>\n",
                state.slug,
                c.slug,
                escape(&c.name),
                c.store_count
            ));
        }
        body.push_str("</ul>\n");
    }
    layout(&format!("{}, {}", city.name, state.name), ctx, &body)
}

pub fn search_page(ctx: &SiteContext, results: &SearchResults) -> String {
    let mut body = format!(
        "<h1>Search results for &quot;{}&quot;</h1>\n<p>{} results</p>\n",
        escape(&results.query),
        results.total()
    );

    if !results.states.is_empty() {
        body.push_str("<h2>States</h2>\n<ul>\n");
        for s in &results.states {
            body.push_str(&format!(
                "<li><a href=\"/state/{}\">{}</a></li>\n",
                s.slug,
                escape(&s.name)
            ));
        }
        body.push_str("</ul>\n");
    }
    if !results.cities.is_empty() {
        body.push_str("<h2>Cities</h2>\n<ul>\n");
        for c in &results.cities {
            body.push_str(&format!(
                "<li><a href=\"/state/{}/{}\">{}, {}</a></li>\n",
                c.state_slug,
                c.city_slug,
                escape(&c.name),
                escape(&c.state)
            ));
        }
        body.push_str("</ul>\n");
    }
    if !results.stores.is_empty() {
        body.push_str("<h2>Stores</h2>\n<ul>\n");
        for s in &results.stores {
            let label = format!(
                "{} &middot; {}, {} &middot; {:.1} ({})",
                escape(&s.name),
                escape(&s.city),
                escape(&s.state),
                s.rating,
                s.review_count
            );
            match (&s.state_slug, &s.city_slug) {
                (Some(state), Some(city)) => body.push_str(&format!(
                    "<li><a href=\"/state/{state}/{city}\">{label}</a></li>\n"
                )),
                _ => body.push_str(&format!("<li>{label}</li>\n")),
            }
        }
        body.push_str("</ul>\n");
    }
    if results.is_empty() {
        body.push_str("<p>No stores, cities or states matched your search.</p>\n");
    }
    layout("Search", ctx, &body)
}

/// Human-readable sitemap: every state with its cities.
pub fn sitemap_page(ctx: &SiteContext, h: &Hierarchy) -> String {
    let mut states: Vec<&StateAggregate> = h.states().iter().collect();
    states.sort_by(|a, b| a.name.cmp(&b.name));

    let mut body = String::from(
        "<h1>Sitemap</h1>\n<ul>\n<li><a href=\"/\">Home</a></li>\n\
         <li><a href=\"/about\">About</a></li>\n</ul>\n",
    );
    for state in states {
        body.push_str(&format!(
            "<h2><a href=\"/state/{}\">{}</a></h2>\n<ul>\n",
            state.slug,
            escape(&state.name)
        ));
        for city in &state.cities {
            body.push_str(&format!(
                "<li><a href=\"/state/{}/{}\">{}</a></li>\n",
                state.slug,
                city.slug,
                escape(&city.name)
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Sitemap", ctx, &body)
}

pub fn about_page(ctx: &SiteContext) -> String {
    let body = format!(
        "<h1>About</h1>\n<p>{} lists {} consignment and resale stores across {} states, \
         ranked by customer rating and review volume.</p>\n",
        SITE_NAME, ctx.total_stores, ctx.total_states
    );
    layout("About", ctx, &body)
}

pub fn not_found_page(ctx: &SiteContext) -> String {
    layout(
        "Page not found",
        ctx,
        "<h1>Page not found</h1>\n<p>The page you were looking for does not exist. \
         <a href=\"/\">Back to the directory</a>.</p>\n",
    )
}

/// sitemaps.org urlset document.
pub fn sitemap_xml(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        let lastmod = entry.lastmod.format("%Y-%m-%d").to_string();
        for (tag, value) in [
            ("loc", entry.loc.as_str()),
            ("lastmod", lastmod.as_str()),
            ("changefreq", entry.changefreq),
            ("priority", entry.priority),
        ] {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Minimal valid sitemap listing only the home page.
pub fn fallback_sitemap_xml(base_url: &str, lastmod: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<urlset xmlns=\"{}\">\n",
            "    <url>\n",
            "        <loc>{}/</loc>\n",
            "        <lastmod>{}</lastmod>\n",
            "        <priority>1.0</priority>\n",
            "    </url>\n",
            "</urlset>"
        ),
        SITEMAP_NS,
        escape(base_url.trim_end_matches('/')),
        lastmod
    )
}
