use r3k_spider::edgar::FormatVersion;
use r3k_spider::error::ParseError;
use r3k_spider::ncsr::{parse_filing, split_pages, Holding};

fn holding(sector: &str, company_name: &str, shares: i64, value: Option<i64>) -> Holding {
    Holding {
        sector: sector.to_string(),
        company_name: company_name.to_string(),
        shares: Some(shares),
        value,
    }
}

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!("{}/tests/files/{name}", env!("CARGO_MANIFEST_DIR")))
        .expect("fixture file")
}

#[test]
fn legacy_schedule() {
    let filing = parse_filing(&fixture("legacy.htm"), FormatVersion::Legacy).unwrap();

    assert_eq!(filing.etf_name, "ishares® russell 3000 index fund");
    assert_eq!(filing.report_date.to_string(), "2009-03-31");
    assert_eq!(
        filing.holdings,
        vec![
            holding("ADVERTISING", "Omnicom Group Inc.", 1_000, Some(25_000)),
            holding("ADVERTISING", "Interpublic Group of Companies Inc.", 2_000, Some(5_000)),
            holding("AEROSPACE & DEFENSE", "Boeing Co. (The)", 500, Some(40_000)),
            holding("AEROSPACE & DEFENSE", "Orbital Holdings Corp.", 100, None),
            holding("BANKS", "Wells Fargo & Co.", 1_500, Some(45_000)),
        ]
    );
}

#[test]
fn modern_schedule_with_header_table() {
    let filing = parse_filing(&fixture("modern.htm"), FormatVersion::Modern).unwrap();

    assert_eq!(filing.etf_name, "ishares® russell 3000 etf");
    assert_eq!(filing.report_date.to_string(), "2019-09-30");
    assert_eq!(
        filing.holdings,
        vec![
            holding("Aerospace & Defense", "Boeing Co. (The)", 100, Some(30_000)),
            holding("Aerospace & Defense", "Lockheed Martin Corp.", 50, Some(20_000)),
            holding("Banks", "JPMorgan Chase & Co.", 200, Some(25_000)),
            holding("Banks", "Wells Fargo & Co.", 300, Some(15_000)),
            holding("Software", "Microsoft Corp.", 400, Some(60_000)),
            holding("Software", "Shell Software Inc.", 10, None),
        ]
    );

    // summary schedule and money market holdings stay out
    assert!(filing
        .holdings
        .iter()
        .all(|h| h.company_name != "Apple Inc." && !h.company_name.starts_with("BlackRock")));
}

#[test]
fn modern_schedule_with_header_paragraphs() {
    let filing = parse_filing(&fixture("modern_paragraphs.htm"), FormatVersion::Modern).unwrap();

    assert_eq!(filing.etf_name, "ishares® russell 3000 index fund");
    assert_eq!(filing.report_date.to_string(), "2011-03-31");
    assert_eq!(
        filing.holdings,
        vec![holding("BANKS", "JPMorgan Chase & Co.", 10, Some(1_000))]
    );
}

#[test]
fn rows_carry_the_filing_header() {
    let filing = parse_filing(&fixture("modern_paragraphs.htm"), FormatVersion::Modern).unwrap();
    let rows = filing.rows();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sector, "BANKS");
    assert_eq!(rows[0].report_date, filing.report_date);
    assert_eq!(rows[0].etf_name, "ishares® russell 3000 index fund");
}

#[test]
fn grand_total_mismatch() {
    let html = String::from_utf8(fixture("modern.htm"))
        .unwrap()
        .replace("<td>150,000</td>", "<td>150,001</td>");

    match parse_filing(html.as_bytes(), FormatVersion::Modern) {
        Err(ParseError::TotalMismatch {
            label,
            stated,
            derived,
        }) => {
            assert_eq!(label, "Total Common Stocks");
            assert_eq!(stated, 150_001);
            assert_eq!(derived, 150_000);
        }
        other => panic!("expected a total mismatch, got {other:?}"),
    }
}

#[test]
fn sector_total_mismatch() {
    let html = String::from_utf8(fixture("modern.htm"))
        .unwrap()
        .replace("<td>40,000</td>", "<td>45,000</td>");

    match parse_filing(html.as_bytes(), FormatVersion::Modern) {
        Err(ParseError::TotalMismatch {
            label,
            stated,
            derived,
        }) => {
            assert_eq!(label, "Banks");
            assert_eq!(stated, 45_000);
            assert_eq!(derived, 40_000);
        }
        other => panic!("expected a total mismatch, got {other:?}"),
    }
}

#[test]
fn unknown_row_shape() {
    let html = String::from_utf8(fixture("modern.htm")).unwrap().replace(
        "<td>Lockheed Martin Corp.</td><td>50</td>",
        "<td>Lockheed Martin Corp.</td><td>50</td><td>7</td><td>8</td>",
    );

    assert!(matches!(
        parse_filing(html.as_bytes(), FormatVersion::Modern),
        Err(ParseError::Row(_))
    ));
}

#[test]
fn wrong_format_version() {
    // a single holdings table on the first page is not a modern layout
    assert!(matches!(
        parse_filing(&fixture("legacy.htm"), FormatVersion::Modern),
        Err(ParseError::TableLayout(1))
    ));
}

#[test]
fn no_schedule() {
    let html = b"<html><body><p>Annual Report</p></body></html>";
    assert!(matches!(
        parse_filing(html, FormatVersion::Legacy),
        Err(ParseError::NoSchedule)
    ));
    assert!(matches!(
        parse_filing(html, FormatVersion::Modern),
        Err(ParseError::NoSchedule)
    ));
}

#[test]
fn pages() {
    let html = "<p>cover</p>\
        <p style=\"page-break-before:always\">one</p>\
        <div>still one</div>\
        <hr style=\"PAGE-BREAK-AFTER: always\">\
        <p>two</p>\
        <DIV style=\"page-break-before: always\">three</DIV>";

    let pages = split_pages(html);
    assert_eq!(pages.len(), 3);
    assert!(pages[0].starts_with("<p style"));
    assert!(pages[0].contains("still one"));
    assert!(pages[0].ends_with("always\">"));
    assert_eq!(pages[1], "<p>two</p>");
    assert!(pages[2].contains("three"));

    assert!(split_pages("<p>no breaks</p>").is_empty());
}

fn modern_with(from: &str, to: &str) -> Vec<u8> {
    let html = String::from_utf8(fixture("modern.htm")).unwrap();
    assert!(html.contains(from), "fixture lacks {from}");
    html.replacen(from, to, 1).into_bytes()
}

#[test]
fn footnote_after_missing_value() {
    let buf = modern_with(
        "<td>Shell Software Inc.</td><td>10</td><td>&nbsp;</td><td>—</td>",
        "<td>Shell Software Inc.</td><td>10</td><td>(e)</td><td>(a)</td>",
    );
    let filing = parse_filing(&buf, FormatVersion::Modern).unwrap();

    assert_eq!(filing.holdings.len(), 6);
    assert_eq!(
        filing.holdings[5],
        holding("Software", "Shell Software Inc.", 10, None)
    );
}

#[test]
fn holding_before_any_sector() {
    let buf = modern_with("<tr><td>Aerospace &amp; Defense — 1.50%</td></tr>", "");

    match parse_filing(&buf, FormatVersion::Modern) {
        Err(ParseError::OrphanHolding(company)) => assert_eq!(company, "Boeing Co. (The)"),
        other => panic!("expected an orphan holding, got {other:?}"),
    }
}

#[test]
fn total_before_any_sector() {
    let buf = modern_with(
        "<tr><td>Aerospace &amp; Defense — 1.50%</td></tr>",
        "<tr><td>5</td></tr><tr><td>Aerospace &amp; Defense — 1.50%</td></tr>",
    );

    assert!(matches!(
        parse_filing(&buf, FormatVersion::Modern),
        Err(ParseError::OrphanTotal(5))
    ));
}

#[test]
fn second_total_for_a_sector() {
    let buf = modern_with(
        "<td>50,000</td></tr>",
        "<td>50,000</td></tr><tr><td>50,000</td></tr>",
    );

    match parse_filing(&buf, FormatVersion::Modern) {
        Err(ParseError::DuplicateTotal(sector)) => assert_eq!(sector, "Aerospace & Defense"),
        other => panic!("expected a duplicate total, got {other:?}"),
    }
}

#[test]
fn schedule_without_grand_total() {
    let buf = modern_with(
        "<tr><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td><td>150,000</td></tr>",
        "",
    );

    assert!(matches!(
        parse_filing(&buf, FormatVersion::Modern),
        Err(ParseError::MissingGrandTotal)
    ));
}

#[test]
fn pages_disagree_on_report_date() {
    let html = String::from_utf8(fixture("modern.htm")).unwrap();
    let second = html.rfind("<tr><td>September 30, 2019</td></tr>").unwrap();
    let html = format!(
        "{}{}",
        &html[..second],
        html[second..].replacen("September 30, 2019", "March 31, 2019", 1)
    );

    assert!(matches!(
        parse_filing(html.as_bytes(), FormatVersion::Modern),
        Err(ParseError::InconsistentPages)
    ));
}

#[test]
fn other_fund() {
    let html = String::from_utf8(fixture("modern.htm"))
        .unwrap()
        .replace("Russell 3000 ETF", "Russell 3000 Growth ETF");

    match parse_filing(html.as_bytes(), FormatVersion::Modern) {
        Err(ParseError::FundName(name)) => assert_eq!(name, "iShares® Russell 3000 Growth ETF"),
        other => panic!("expected a fund name error, got {other:?}"),
    }
}

#[test]
fn other_title() {
    let html = r3k_spider::ncsr::text::decode(&fixture("legacy.htm")).replace(
        "<b>Schedule of Investments</b>",
        "<b>Consolidated Schedule of Investments</b>",
    );

    match parse_filing(html.as_bytes(), FormatVersion::Legacy) {
        Err(ParseError::Header(title)) => {
            assert_eq!(title, "Consolidated Schedule of Investments")
        }
        other => panic!("expected a header error, got {other:?}"),
    }
}
