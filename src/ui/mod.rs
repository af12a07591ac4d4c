/// UI views
///
/// Each screen is a plain function from state to `Element`; nothing here
/// holds state of its own, so every derived flag is recomputed on each
/// redraw.
///
/// - `nav.rs` - back/forward, address bar, screen links
/// - `search.rs` - search box, result grid, load more
/// - `pagination.rs` - numbered page links
/// - `detail.rs` - single movie
/// - `toggle.rs` - add/remove favourite button
/// - `favourites.rs` - favourites grid

pub mod detail;
pub mod favourites;
pub mod nav;
pub mod pagination;
pub mod search;
pub mod toggle;

use iced::widget::{button, container, image, text, Button, Image};
use iced::{Element, Length};

use crate::state::address::Route;
use crate::state::posters::PosterCache;
use crate::Message;

/// Width of a poster in the result and favourites grids
pub const CARD_WIDTH: f32 = 200.0;

/// Poster image, or a placeholder box while loading / when missing
pub fn poster<'a>(posters: &PosterCache, url: Option<&str>, width: f32) -> Element<'a, Message> {
    let placeholder = match url {
        Some(url) if posters.is_loading(url) => "Loading poster...",
        _ => "No poster",
    };

    match url.and_then(|url| posters.get(url)) {
        Some(handle) => Image::<image::Handle>::new(handle.clone())
            .width(Length::Fixed(width))
            .into(),
        None => container(text(placeholder).size(14))
            .width(Length::Fixed(width))
            .height(Length::Fixed(width * 1.5))
            .center_x(Length::Fixed(width))
            .center_y(Length::Fixed(width * 1.5))
            .into(),
    }
}

/// Text-styled button that moves to another address
pub fn link<'a>(content: impl Into<Element<'a, Message>>, route: Route) -> Button<'a, Message> {
    button(content)
        .on_press(Message::Navigate(route))
        .style(button::text)
        .padding(0)
}
