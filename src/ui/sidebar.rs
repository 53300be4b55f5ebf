/// Available photographs list
///
/// Clicking an entry adds it to the end of the layout; its ⇤ button drops it
/// in front of the first cell instead.
use iced::widget::{button, column, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};

use photo_layout::layout::{DragSource, DropTarget, GridEvent};
use photo_layout::state::Photograph;

use crate::Message;

/// Drop `id` onto the first layout cell, if there is one
fn insert_front(id: &str, first: Option<&Photograph>) -> Option<Message> {
    first.map(|first| {
        Message::Grid(GridEvent::DragEnd {
            source: DragSource::Available(id.to_string()),
            target: Some(DropTarget::Grid(first.id.clone())),
        })
    })
}

pub fn view<'a>(available: &[&'a Photograph], first: Option<&'a Photograph>) -> Element<'a, Message> {
    let header = text(format!("Available Images ({})", available.len())).size(20);

    if available.is_empty() {
        return column![header, text("All images assigned").size(14)]
            .spacing(10)
            .width(Length::Fixed(240.0))
            .into();
    }

    let entries = available.iter().copied().fold(Column::new().spacing(6), |list, photograph| {
        let entry = button(
            column![
                text(&photograph.title).size(14),
                text(photograph.capture_time.format("%Y-%m-%d %H:%M").to_string()).size(11),
            ]
            .spacing(2),
        )
        .width(Length::Fill)
        .on_press(Message::AvailableSelected(photograph.id.clone()));

        let to_front = button(text("⇤").size(12))
            .padding([2, 6])
            .on_press_maybe(insert_front(&photograph.id, first));

        list.push(row![entry, to_front].spacing(4).align_y(Alignment::Center))
    });

    column![header, scrollable(entries).height(Length::Fill)]
        .spacing(10)
        .width(Length::Fixed(240.0))
        .into()
}
