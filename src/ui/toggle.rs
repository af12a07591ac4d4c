use iced::widget::{button, text};
use iced::Element;

use crate::state::favourites::FavouritesStore;
use crate::Message;

/// Label and message for the favourite button of `id`
pub fn action(is_favourite: bool, id: &str) -> (&'static str, Message) {
    if is_favourite {
        ("★ Remove from favourites", Message::RemoveFavourite(id.to_string()))
    } else {
        ("☆ Add to favourites", Message::AddFavourite(id.to_string()))
    }
}

/// Exactly one of add/remove, depending on the store right now
pub fn view<'a>(id: &str, favourites: &FavouritesStore) -> Element<'a, Message> {
    let is_favourite = favourites.is_favourite(id);
    let (label, message) = action(is_favourite, id);

    let style = if is_favourite {
        button::secondary
    } else {
        button::primary
    };

    button(text(label)).on_press(message).style(style).padding(10).into()
}
