//! HTML renderer
//!
//! Produces an accessible `<figure>` containing the table, its caption and a
//! footer with units, source and footnotes. Headings become `<th>` elements
//! with the appropriate `scope`, merges become `colspan`/`rowspan`, and
//! alignment is expressed through `align-*` CSS classes.

use tracing::debug;

use super::errors::RenderResult;
use super::markup::{Markup, ValueContext, render_value};
use super::{NOTES_LABEL, SOURCE_LABEL, UNITS_LABEL};
use crate::html::HtmlElement;
use crate::models::RenderRequest;
use crate::table_model::TableModel;

const NOWRAP_CLASS: &str = "table__nowrap";

/// Render a request as an HTML fragment
///
/// # Errors
///
/// Never fails today; the `Result` keeps the signature uniform with the
/// other renderers.
pub fn render_html(request: &RenderRequest) -> RenderResult<Vec<u8>> {
    Ok(render_html_string(request).into_bytes())
}

/// Render a request as an HTML string
#[must_use]
pub fn render_html_string(request: &RenderRequest) -> String {
    let model = TableModel::build(request);
    let context = ValueContext::new(&request.filename, request.footnotes.len());

    let mut figure = HtmlElement::new("figure")
        .with_class("figure")
        .with_attribute("id", format!("table-{}", request.filename))
        .with_text("\n");
    figure.append_child(table_element(&model, &context));
    figure.append_child(footer_element(request, &context));
    figure.append_text("\n");

    let mut out = figure.to_html();
    out.push('\n');
    debug!(
        file_name = %request.filename,
        "rendered html for {} rows x {} columns",
        model.row_count(),
        model.column_count()
    );
    out
}

fn table_element(model: &TableModel<'_>, context: &ValueContext<'_>) -> HtmlElement {
    let request = model.request();
    let mut table = HtmlElement::new("table").with_class("table").with_text("\n");

    if let Some(caption) = caption_element(request, context) {
        table.append_child(caption);
        table.append_text("\n");
    }

    if !request.column_formats.is_empty() {
        let mut colgroup = HtmlElement::new("colgroup");
        for column in model.columns() {
            let mut col = HtmlElement::new("col");
            if !column.width.is_empty() {
                col.set_attribute("style", format!("width: {}", column.width));
            }
            colgroup.append_child(col);
        }
        table.append_child(colgroup);
        table.append_text("\n");
    }

    for (row_index, row) in request.data.iter().enumerate() {
        table.append_child(row_element(model, context, row_index, row));
        table.append_text("\n");
    }
    table
}

fn caption_element(request: &RenderRequest, context: &ValueContext<'_>) -> Option<HtmlElement> {
    if request.title.is_empty() && request.subtitle.is_empty() {
        return None;
    }

    let mut caption = HtmlElement::new("caption").with_class("table__caption");
    caption.append_children(render_value(&request.title, context, Markup::Escaped));
    if !request.subtitle.is_empty() {
        caption.append_child(HtmlElement::new("br"));
        let mut subtitle = HtmlElement::new("span").with_class("table__subtitle");
        subtitle.append_children(render_value(&request.subtitle, context, Markup::Escaped));
        caption.append_child(subtitle);
    }
    Some(caption)
}

fn row_element(
    model: &TableModel<'_>,
    context: &ValueContext<'_>,
    row_index: usize,
    row: &[String],
) -> HtmlElement {
    let keep_together = model.request().keep_headers_together;
    let mut tr = HtmlElement::new("tr");

    if let Some(row_model) = model.rows().get(row_index) {
        if row_model.heading {
            tr.add_class("table__header-row");
            if keep_together {
                tr.add_class(NOWRAP_CLASS);
            }
        }
        if let Some(vertical) = row_model.vertical_align {
            tr.add_class(vertical.css_class());
        }
        if !row_model.height.is_empty() {
            tr.set_attribute("style", format!("height: {}", row_model.height));
        }
    }

    for (column_index, value) in row.iter().enumerate() {
        if !model.is_visible(row_index, column_index) {
            continue;
        }
        tr.append_child(cell_element(model, context, row_index, column_index, value));
    }
    tr
}

fn cell_element(
    model: &TableModel<'_>,
    context: &ValueContext<'_>,
    row: usize,
    column: usize,
    value: &str,
) -> HtmlElement {
    let style = model.resolve(row, column);
    let has_content = !value.is_empty();

    let mut cell = if style.row_heading && has_content {
        let scope = if style.colspan > 1 { "colgroup" } else { "col" };
        HtmlElement::new("th").with_attribute("scope", scope)
    } else if style.column_heading && has_content {
        let scope = if style.rowspan > 1 { "rowgroup" } else { "row" };
        let mut th = HtmlElement::new("th").with_attribute("scope", scope);
        if model.request().keep_headers_together {
            th.add_class(NOWRAP_CLASS);
        }
        th
    } else {
        HtmlElement::new("td")
    };

    if style.colspan > 1 {
        cell.set_attribute("colspan", style.colspan.to_string());
    }
    if style.rowspan > 1 {
        cell.set_attribute("rowspan", style.rowspan.to_string());
    }
    if let Some(align) = style.align {
        cell.add_class(align.css_class());
    }
    // Row-level vertical alignment is already on the <tr>.
    if let Some(vertical) = model.cell(row, column).vertical_align {
        cell.add_class(vertical.css_class());
    }

    cell.append_children(render_value(value, context, Markup::Embedded));
    cell
}

fn footer_element(request: &RenderRequest, context: &ValueContext<'_>) -> HtmlElement {
    let mut footer = HtmlElement::new("footer")
        .with_class("figure__footer")
        .with_text("\n");

    if !request.units.is_empty() {
        let mut units = HtmlElement::new("p").with_class("figure__units");
        units.append_children(render_value(
            &format!("{UNITS_LABEL}{}", request.units),
            context,
            Markup::Escaped,
        ));
        footer.append_child(units);
        footer.append_text("\n");
    }

    if !request.source.is_empty() {
        let mut source = HtmlElement::new("p").with_class("figure__source");
        source.append_children(render_value(
            &format!("{SOURCE_LABEL}{}", request.source),
            context,
            Markup::Escaped,
        ));
        footer.append_child(source);
        footer.append_text("\n");
    }

    if !request.footnotes.is_empty() {
        footer.append_child(
            HtmlElement::new("p")
                .with_class("figure__notes")
                .with_text(NOTES_LABEL),
        );
        footer.append_text("\n");

        let mut list = HtmlElement::new("ol")
            .with_class("figure__footnotes")
            .with_text("\n");
        for (index, note) in request.footnotes.iter().enumerate() {
            let mut item = HtmlElement::new("li")
                .with_attribute("id", context.footnote_id(index + 1))
                .with_class("figure__footnote-item");
            item.append_children(render_value(note, context, Markup::Escaped));
            list.append_child(item);
            list.append_text("\n");
        }
        footer.append_child(list);
        footer.append_text("\n");
    }

    footer
}
