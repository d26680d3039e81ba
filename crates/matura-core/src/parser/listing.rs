//! Listing page parser for arkusze.pl
//!
//! Parses the table of exam sittings for one subject/level combination.

use scraper::{ElementRef, Html, Selector};

use crate::error::{MaturaError, Result};
use crate::types::ExamSitting;
use crate::url::resolve_link;

/// Minimum number of cells a table row needs: date, type, organizer, link
const MIN_CELLS: usize = 4;

/// Parses a listing page and returns every qualifying table row as a sitting
///
/// A row qualifies when it has at least four `<td>` cells. Rows with fewer
/// cells (headers, spacers, ads) are skipped silently. The detail link is
/// the first anchor with an `href` in the fourth cell, resolved against
/// `page_url`; rows without such an anchor are still returned so their year
/// is visible, but carry `detail_url: None`.
///
/// # Arguments
/// * `html` - Raw HTML string from the listing page
/// * `page_url` - Absolute URL the listing was fetched from
///
/// # Returns
/// Sittings in document order, empty if the page has no qualifying rows
///
/// # Errors
/// Returns `ParseError` if a selector cannot be built
pub fn parse_listing(html: &str, page_url: &str) -> Result<Vec<ExamSitting>> {
    let document = Html::parse_document(html);

    let row_selector = Selector::parse("tr")
        .map_err(|e| MaturaError::ParseError(format!("Invalid selector: {:?}", e)))?;
    let cell_selector = Selector::parse("td")
        .map_err(|e| MaturaError::ParseError(format!("Invalid selector: {:?}", e)))?;
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| MaturaError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let sittings = document
        .select(&row_selector)
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
            parse_row(&cells, &link_selector, page_url)
        })
        .collect();

    Ok(sittings)
}

/// Builds a sitting from the cells of one table row
fn parse_row(
    cells: &[ElementRef],
    link_selector: &Selector,
    page_url: &str,
) -> Option<ExamSitting> {
    if cells.len() < MIN_CELLS {
        return None;
    }

    let detail_url = cells[3]
        .select(link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_link(page_url, href).ok());

    Some(ExamSitting {
        date: cell_text(&cells[0]),
        exam_type: cell_text(&cells[1]),
        organizer: cell_text(&cells[2]),
        detail_url,
    })
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PAGE: &str = "https://arkusze.pl/matematyka-matura-poziom-podstawowy/";

    #[test]
    fn test_parse_empty_html() {
        let sittings = parse_listing("<html><body></body></html>", PAGE).unwrap();
        assert!(sittings.is_empty());
    }

    #[test]
    fn test_parse_listing_rows() {
        let html = r#"
        <html><body>
        <table>
            <tr><th>Data</th><th>Typ</th><th>Organizator</th><th>Arkusz</th></tr>
            <tr>
                <td> 8 maja 2023 </td>
                <td>Formuła 2023</td>
                <td>CKE</td>
                <td><a href="/matura-matematyka-maj-2023/">Zobacz</a></td>
            </tr>
            <tr>
                <td>5 maja 2022</td>
                <td>Formuła 2015</td>
                <td>CKE</td>
                <td><a href="matura-matematyka-maj-2022/">Zobacz</a></td>
            </tr>
        </table>
        </body></html>
        "#;

        let sittings = parse_listing(html, PAGE).unwrap();
        assert_eq!(sittings.len(), 2);

        assert_eq!(sittings[0].date, "8 maja 2023");
        assert_eq!(sittings[0].exam_type, "Formuła 2023");
        assert_eq!(sittings[0].organizer, "CKE");
        assert_eq!(
            sittings[0].detail_url.as_deref(),
            Some("https://arkusze.pl/matura-matematyka-maj-2023/")
        );
        assert_eq!(
            sittings[1].detail_url.as_deref(),
            Some("https://arkusze.pl/matematyka-matura-poziom-podstawowy/matura-matematyka-maj-2022/")
        );
    }

    #[test]
    fn test_skip_rows_with_fewer_than_four_cells() {
        let html = r#"
        <table>
            <tr><td>reklama</td></tr>
            <tr><td>1 czerwca 2021</td><td>Próbna</td><td>CKE</td></tr>
            <tr><td>4 maja 2021</td><td>Formuła 2015</td><td>CKE</td><td><a href="/a/">x</a></td></tr>
        </table>
        "#;

        let sittings = parse_listing(html, PAGE).unwrap();
        assert_eq!(sittings.len(), 1);
        assert_eq!(sittings[0].date, "4 maja 2021");
    }

    #[test]
    fn test_row_without_anchor_has_no_detail_url() {
        let html = r#"
        <table>
            <tr><td>3 marca 2020</td><td>Próbna</td><td>Operon</td><td>brak</td></tr>
        </table>
        "#;

        let sittings = parse_listing(html, PAGE).unwrap();
        assert_eq!(sittings.len(), 1);
        assert_eq!(sittings[0].detail_url, None);
        assert_eq!(sittings[0].year(), "2020");
    }

    #[test]
    fn test_only_fourth_cell_anchor_is_used() {
        let html = r#"
        <table>
            <tr>
                <td><a href="/wrong/">8 maja 2023</a></td>
                <td>Formuła 2023</td>
                <td>CKE</td>
                <td><a href="/right/">Zobacz</a><a href="/second/">PDF</a></td>
                <td>extra</td>
            </tr>
        </table>
        "#;

        let sittings = parse_listing(html, PAGE).unwrap();
        assert_eq!(sittings[0].date, "8 maja 2023");
        assert_eq!(sittings[0].detail_url.as_deref(), Some("https://arkusze.pl/right/"));
    }

    #[test]
    fn test_nested_cell_text_is_collected() {
        let html = r#"
        <table>
            <tr>
                <td><strong>8</strong> maja 2023</td>
                <td><span>Formuła</span> 2023</td>
                <td>CKE</td>
                <td><a href="/x/">Zobacz</a></td>
            </tr>
        </table>
        "#;

        let sittings = parse_listing(html, PAGE).unwrap();
        assert_eq!(sittings[0].date, "8 maja 2023");
        assert_eq!(sittings[0].exam_type, "Formuła 2023");
    }

    proptest! {
        #[test]
        fn prop_every_qualifying_row_yields_absolute_link(
            rows in prop::collection::vec(
                ("[a-z]{1,8} [0-9]{4}", "[A-Za-z]{1,10}", "[A-Z]{2,5}", "[a-z0-9-]{1,12}"),
                0..8,
            )
        ) {
            let body: String = rows
                .iter()
                .map(|(date, kind, org, slug)| {
                    format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td><a href=\"{}/\">x</a></td></tr>",
                        date, kind, org, slug
                    )
                })
                .collect();
            let html = format!("<table>{}</table>", body);

            let sittings = parse_listing(&html, PAGE).unwrap();
            prop_assert_eq!(sittings.len(), rows.len());

            for (sitting, (date, kind, org, slug)) in sittings.iter().zip(rows.iter()) {
                prop_assert_eq!(&sitting.date, date);
                prop_assert_eq!(&sitting.exam_type, kind);
                prop_assert_eq!(&sitting.organizer, org);
                let expected = format!("{}{}/", PAGE, slug);
                prop_assert_eq!(sitting.detail_url.as_deref(), Some(expected.as_str()));
            }
        }
    }
}
