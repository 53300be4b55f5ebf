/// Layout grid
///
/// Selected photographs in order, wrapped into rows of `GRID_COLUMNS`
/// units. A cell's width follows its width span. Each cell takes
/// left/right clicks on its caption (click-modifier model) and has its own
/// move, resize and remove buttons below it (grid model).
use iced::widget::{button, column, container, mouse_area, text};
use iced::{Element, Length};
use iced_aw::Wrap;

use photo_layout::layout::{DragSource, DropTarget, GridEvent, PointerButton};
use photo_layout::state::data::{GRID_COLUMNS, MAX_SPAN, MIN_SPAN};
use photo_layout::state::{Dimension, Photograph, Placement};

use crate::Message;

/// Size of one grid unit in logical pixels
const CELL: f32 = 150.0;
const SPACING: f32 = 10.0;

fn span_length(span: u8) -> f32 {
    let span = f32::from(span);
    CELL * span + SPACING * (span - 1.0)
}

fn small(label: &str, message: Option<Message>) -> Element<'_, Message> {
    button(text(label).size(12))
        .padding([2, 6])
        .on_press_maybe(message)
        .into()
}

fn resize(id: &str, dimension: Dimension, delta: i8, enabled: bool) -> Option<Message> {
    enabled.then(|| {
        Message::Grid(GridEvent::Resize {
            id: id.to_string(),
            dimension,
            delta,
        })
    })
}

fn move_onto(id: &str, neighbour: Option<&Photograph>) -> Option<Message> {
    neighbour.map(|other| drop_grid(id, DropTarget::Grid(other.id.clone())))
}

fn drop_grid(id: &str, target: DropTarget) -> Message {
    Message::Grid(GridEvent::DragEnd {
        source: DragSource::Grid(id.to_string()),
        target: Some(target),
    })
}

/// Button row of a cell: label and message, `None` when disabled
fn cell_controls(
    photograph: &Photograph,
    layout: Placement,
    previous: Option<&Photograph>,
    next: Option<&Photograph>,
) -> Vec<(&'static str, Option<Message>)> {
    let width = layout.span(Dimension::Width);
    let height = layout.span(Dimension::Height);
    let id = photograph.id.as_str();

    vec![
        ("◀", move_onto(id, previous)),
        ("▶", move_onto(id, next)),
        ("⇥", next.is_some().then(|| drop_grid(id, DropTarget::GridEnd))),
        ("W−", resize(id, Dimension::Width, -1, width > MIN_SPAN)),
        ("W+", resize(id, Dimension::Width, 1, width < MAX_SPAN)),
        ("H−", resize(id, Dimension::Height, -1, height > MIN_SPAN)),
        ("H+", resize(id, Dimension::Height, 1, height < MAX_SPAN)),
        ("✎", Some(Message::EditTitle(photograph.id.clone()))),
        ("↩", Some(drop_grid(id, DropTarget::Sidebar))),
        ("×", Some(Message::Grid(GridEvent::Remove(photograph.id.clone())))),
    ]
}

fn cell<'a>(
    photograph: &'a Photograph,
    previous: Option<&'a Photograph>,
    next: Option<&'a Photograph>,
) -> Element<'a, Message> {
    let Some(layout) = photograph.layout else {
        return column![].into();
    };
    let width = layout.span(Dimension::Width);
    let height = layout.span(Dimension::Height);

    let buttons: Vec<Element<'a, Message>> = cell_controls(photograph, layout, previous, next)
        .into_iter()
        .map(|(label, message)| small(label, message))
        .collect();
    let controls = Wrap::with_elements(buttons).spacing(4.0).line_spacing(4.0);

    // Only the caption takes cell clicks; a right press on a control
    // must not reach the swap handler.
    let caption = mouse_area(
        container(
            column![
                text(&photograph.title).size(14),
                text(format!("#{}  {}×{}", layout.order, width, height)).size(12),
            ]
            .spacing(6),
        )
        .width(Length::Fill)
        .height(Length::Fill),
    )
    .on_press(Message::CellPressed(photograph.id.clone(), PointerButton::Primary))
    .on_right_press(Message::CellPressed(photograph.id.clone(), PointerButton::Secondary));

    container(column![caption, controls].spacing(6))
        .padding(8)
        .width(Length::Fixed(span_length(width)))
        .height(Length::Fixed(span_length(height)))
        .style(container::rounded_box)
        .into()
}

pub fn view<'a>(selected: &[&'a Photograph]) -> Element<'a, Message> {
    let grid_width = span_length(GRID_COLUMNS);

    if selected.is_empty() {
        return container(text("Add images from the list to start the layout").size(16))
            .width(Length::Fixed(grid_width))
            .padding(20)
            .into();
    }

    let cells: Vec<Element<'a, Message>> = selected
        .iter()
        .copied()
        .enumerate()
        .map(|(index, photograph)| {
            let previous = index.checked_sub(1).map(|i| selected[i]);
            let next = selected.get(index + 1).copied();
            cell(photograph, previous, next)
        })
        .collect();

    container(Wrap::with_elements(cells).spacing(SPACING).line_spacing(SPACING))
        .width(Length::Fixed(grid_width))
        .into()
}
