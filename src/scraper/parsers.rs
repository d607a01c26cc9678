use crate::models::RawListing;
use anyhow::Result;
use scraper::{Html, Selector};

// ── Search results page ───────────────────────────────────────────────────────

/// Extract raw listing records from a search results page. Every `.s-item`
/// block yields one record; missing sub-elements become `None` and the
/// cleaner decides what to do with them.
pub fn parse_search_page(html: &str) -> Result<Vec<RawListing>> {
    let doc = Html::parse_document(html);

    let item_sel = Selector::parse(".s-item")
        .map_err(|e| anyhow::anyhow!("item selector: {:?}", e))?;
    let title_sel = Selector::parse(".s-item__title")
        .map_err(|e| anyhow::anyhow!("title selector: {:?}", e))?;
    let price_sel = Selector::parse(".s-item__price")
        .map_err(|e| anyhow::anyhow!("price selector: {:?}", e))?;
    let link_sel = Selector::parse("a.s-item__link")
        .map_err(|e| anyhow::anyhow!("link selector: {:?}", e))?;
    let image_sel = Selector::parse(".s-item__image img")
        .map_err(|e| anyhow::anyhow!("image selector: {:?}", e))?;

    let mut listings = Vec::new();

    for item in doc.select(&item_sel) {
        let title = item
            .select(&title_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string());

        let price_text = item
            .select(&price_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string());

        let url = item
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|h| h.to_string());

        let image_url = item
            .select(&image_sel)
            .next()
            .and_then(|img| img.value().attr("src").or(img.value().attr("data-src")))
            .map(|s| s.to_string());

        if title.is_none() && price_text.is_none() {
            continue;
        }

        listings.push(RawListing {
            title,
            price_text,
            url,
            image_url,
        });
    }

    Ok(listings)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <ul class="srp-results">
          <li class="s-item">
            <a class="s-item__link" href="https://example.com/itm/111">
              <div class="s-item__title">AirPods 2nd Generation</div>
            </a>
            <span class="s-item__price">$79.99</span>
            <div class="s-item__image"><img src="https://example.com/i/111.jpg"></div>
          </li>
          <li class="s-item">
            <div class="s-item__title">AirPods Pro — parts</div>
            <span class="s-item__price">$10.00 to $20.00</span>
          </li>
          <li class="s-item">
            <div class="s-item__title">No price here</div>
          </li>
          <li class="other-widget">ignored</li>
        </ul>
    "#;

    #[test]
    fn test_parse_search_page() {
        let listings = parse_search_page(FIXTURE).unwrap();
        assert_eq!(listings.len(), 3);

        assert_eq!(listings[0].title.as_deref(), Some("AirPods 2nd Generation"));
        assert_eq!(listings[0].price_text.as_deref(), Some("$79.99"));
        assert_eq!(listings[0].url.as_deref(), Some("https://example.com/itm/111"));
        assert_eq!(
            listings[0].image_url.as_deref(),
            Some("https://example.com/i/111.jpg")
        );

        assert_eq!(listings[1].price_text.as_deref(), Some("$10.00 to $20.00"));
        assert_eq!(listings[1].url, None);

        // Price-less block still comes through raw; normalization drops it.
        assert_eq!(listings[2].price_text, None);
    }

    #[test]
    fn test_parse_empty_page() {
        let listings = parse_search_page("<html><body></body></html>").unwrap();
        assert!(listings.is_empty());
    }
}
