use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Cell, Row, Table, Widget},
};
use tracing::trace;

use crate::view::TableView;

pub const HEADER_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);
pub const SELECTED_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

impl<T: Clone + 'static> Widget for &mut TableView<T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Changes made through `model_mut` since the last dispatch.
        self.process_model_events();
        let geometry = self.cell_geometry();
        // Rendering is the layout pass: the columns follow the area we got.
        self.set_viewport_width(area.width as u32 * geometry.width);

        let header_lines = if self.is_header_visible() {
            geometry.lines_for(self.header_height())
        } else {
            0
        };
        let row_lines = geometry.lines_for(self.row_height());
        let row_count = self.row_count();

        let (offset, widths) = match self.grid_mut() {
            Some(grid) => {
                grid.set_frame(area, header_lines, row_lines);
                grid.reveal_lead(row_count);
                grid.clamp_offset(row_count);
                grid.dirty = false;
                (grid.offset, grid.column_widths.clone())
            }
            None => return,
        };
        let visible = (area.height.saturating_sub(header_lines) / row_lines.max(1)) as usize;
        let end = (offset + visible).min(row_count);
        trace!("Rendering rows {offset}..{end} of {row_count} into {area:?}");

        let constraints: Vec<Constraint> = widths
            .iter()
            .map(|w| Constraint::Length(geometry.columns_for(*w)))
            .collect();

        let model = self.model();
        let columns = self.columns();
        let rows: Vec<Row> = (offset..end)
            .map(|row| {
                let cells = columns.iter().enumerate().map(|(column, spec)| {
                    let text = model.value_at(row, column).to_string();
                    let cell = Cell::from(Line::from(text).alignment(spec.alignment.into()));
                    if self.is_cell_selected(row, column) {
                        cell.style(SELECTED_STYLE)
                    } else {
                        cell
                    }
                });
                Row::new(cells).height(row_lines)
            })
            .collect();

        let mut table = Table::new(rows, constraints).column_spacing(0);
        if header_lines > 0 {
            let header = columns.iter().map(|spec| {
                let name = spec.name.clone().unwrap_or_default();
                Cell::from(Line::from(name).alignment(spec.alignment.into()))
            });
            table = table.header(Row::new(header).style(HEADER_STYLE).height(header_lines));
        }
        Widget::render(table, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::crossterm::event::{KeyModifiers, MouseEvent, MouseEventKind};

    use super::*;
    use crate::domain::{CellGeometry, TableOptions};
    use crate::row_model::{ColumnRowModel, ColumnSpec, ValueKind};

    fn line(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.x + buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn city_view() -> TableView<(String, i64)> {
        let row_model = ColumnRowModel::new(vec![
            ColumnSpec::text("City", |r: &(String, i64)| r.0.clone()),
            ColumnSpec::new("Pop", ValueKind::Integer, |r: &(String, i64)| r.1),
        ]);
        let options = TableOptions::default().with_cell_geometry(CellGeometry {
            width: 10,
            height: 18,
        });
        let mut view = TableView::with_row_model(row_model, options);
        view.set_data(vec![
            ("Graz".to_string(), 291),
            ("Linz".to_string(), 207),
            ("Wien".to_string(), 1982),
        ]);
        view.dispatch_pending();
        view
    }

    #[test]
    fn renders_header_and_rows() {
        let mut view = city_view();
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 4));
        (&mut view).render(buf.area, &mut buf);

        assert_eq!(view.column_widths(), vec![100, 100]);
        assert!(line(&buf, 0).starts_with("City"));
        assert!(line(&buf, 0).ends_with("Pop"));
        assert!(line(&buf, 1).starts_with("Graz"));
        assert!(line(&buf, 1).ends_with("291"));
        assert!(line(&buf, 3).ends_with("1982"));
        assert!(buf[(0, 0)].modifier.contains(Modifier::BOLD));
        assert!(!view.needs_repaint());
    }

    #[test]
    fn hidden_header_and_selection_highlight() {
        let mut view = city_view();
        view.set_header_visible(false);
        view.dispatch_pending();
        view.set_row_selection_interval(1, 1);

        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 3));
        (&mut view).render(buf.area, &mut buf);

        assert!(line(&buf, 0).starts_with("Graz"));
        assert!(line(&buf, 1).starts_with("Linz"));
        assert!(buf[(0, 1)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(0, 0)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn lead_row_is_scrolled_into_view() {
        let mut view = city_view();
        view.set_row_selection_interval(2, 2);
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 2));
        (&mut view).render(buf.area, &mut buf);
        assert!(line(&buf, 1).starts_with("Wien"));
    }

    #[test]
    fn row_model_swapped_on_the_model_renders_new_columns() {
        let mut view = city_view();
        view.model_mut()
            .set_row_model(Box::new(ColumnRowModel::new(vec![ColumnSpec::text(
                "Town",
                |r: &(String, i64)| r.0.to_uppercase(),
            )])));

        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 4));
        (&mut view).render(buf.area, &mut buf);

        assert_eq!(view.columns().len(), 1);
        assert!(line(&buf, 0).starts_with("Town"));
        assert!(line(&buf, 1).starts_with("GRAZ"));
    }

    #[test]
    fn wheel_scrolling_survives_the_next_frame() {
        let mut view = city_view();
        view.set_data((0..50).map(|i| (format!("Town{i}"), i)).collect());
        view.dispatch_pending();
        view.set_row_selection_interval(0, 0);
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 6));
        (&mut view).render(buf.area, &mut buf);

        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 1,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        for _ in 0..3 {
            assert!(view.handle_mouse(wheel));
        }
        (&mut view).render(buf.area, &mut buf);
        assert!(line(&buf, 1).starts_with("Town9 "));

        view.set_row_selection_interval(1, 1);
        (&mut view).render(buf.area, &mut buf);
        assert!(line(&buf, 1).starts_with("Town1 "));
    }

    #[test]
    fn disposed_view_renders_nothing() {
        let mut view = city_view();
        view.dispose();
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 3));
        (&mut view).render(buf.area, &mut buf);
        assert_eq!(line(&buf, 0).trim(), "");
    }
}
