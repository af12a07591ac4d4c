use iced::widget::{button, horizontal_space, row, text, Column};
use iced::{Alignment, Element};

use crate::state::address::Route;
use crate::state::history::History;
use crate::Message;

/// Top bar: back/forward, the current address, and screen links
pub fn view<'a>(
    history: &History,
    search_route: Route,
    favourite_count: usize,
    status: Option<&'a str>,
) -> Element<'a, Message> {
    let bar = row![
        button(text("←"))
            .on_press_maybe(history.can_go_back().then_some(Message::Back))
            .style(button::secondary),
        button(text("→"))
            .on_press_maybe(history.can_go_forward().then_some(Message::Forward))
            .style(button::secondary),
        text(history.current().to_string()).size(14),
        horizontal_space(),
        button(text("Search"))
            .on_press(Message::Navigate(search_route))
            .style(button::text),
        button(text(format!("Favourites ({favourite_count})")))
            .on_press(Message::Navigate(Route::Favourites))
            .style(button::text),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let mut content = Column::new().spacing(6).push(bar);
    if let Some(status) = status {
        content = content.push(text(status).size(14));
    }
    content.into()
}
