//! Export request query construction
//!
//! The download endpoint takes a long, mostly static query string: a
//! search configuration block, the publish-date range, the row-offset
//! span, and one `*Csv` flag per exported column. Everything except
//! the date range and offsets is fixed, so the variable parts are
//! spliced into a constant table.

use crate::output::path::format_export_date;
use crate::Window;

/// Query parameters that never change between requests.
///
/// Order matches the service's own search form submission. The column
/// flags at the tail select every exportable column.
const BASE_QUERY: &[(&str, &str)] = &[
    ("morphology", "on"),
    ("search-filter", "Дате размещения"),
    ("pageNumber", "1"),
    ("sortDirection", "true"),
    ("recordsPerPage", "_10"),
    ("showLotsInfoHidden", "false"),
    ("sortBy", "PUBLISH_DATE"),
    ("fz44", "on"),
    ("fz223", "on"),
    ("af", "on"),
    ("ca", "on"),
    ("pc", "on"),
    ("pa", "on"),
    ("currencyIdGeneral", "-1"),
    ("placementCsv", "true"),
    ("registryNumberCsv", "true"),
    ("stepOrderPlacementCsv", "true"),
    ("methodOrderPurchaseCsv", "true"),
    ("nameOrderCsv", "true"),
    ("purchaseNumbersCsv", "true"),
    ("numberLotCsv", "true"),
    ("nameLotCsv", "true"),
    ("maxContractPriceCsv", "true"),
    ("currencyCodeCsv", "true"),
    ("maxPriceContractCurrencyCsv", "true"),
    ("currencyCodeContractCurrencyCsv", "true"),
    ("scopeOkdpCsv", "true"),
    ("scopeOkpdCsv", "true"),
    ("scopeOkpd2Csv", "true"),
    ("scopeKtruCsv", "true"),
    ("ea615ItemCsv", "true"),
    ("customerNameCsv", "true"),
    ("organizationOrderPlacementCsv", "true"),
    ("publishDateCsv", "true"),
    ("lastDateChangeCsv", "true"),
    ("startDateRequestCsv", "true"),
    ("endDateRequestCsv", "true"),
    ("ea615DateCsv", "true"),
    ("featureOrderPlacementCsv", "true"),
];

/// Build the full query for one window.
///
/// Both publish-date bounds carry the same day, so the search is
/// scoped to exactly one calendar date; `from`/`to` select the row
/// span inside that day.
pub fn build_window_query(window: &Window) -> Vec<(String, String)> {
    let day = format_export_date(window.day);

    let mut query: Vec<(String, String)> = Vec::with_capacity(BASE_QUERY.len() + 4);
    for (key, value) in BASE_QUERY {
        query.push((key.to_string(), value.to_string()));
    }
    query.push(("publishDateFrom".to_string(), day.clone()));
    query.push(("publishDateTo".to_string(), day));
    query.push(("from".to_string(), window.offset_from.to_string()));
    query.push(("to".to_string(), window.offset_to.to_string()));
    query
}
