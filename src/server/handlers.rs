pub mod channels;
pub mod playlists;
pub mod stream;

pub use channels::{handle_channels, handle_groups};
pub use playlists::{handle_add_playlist, handle_list_playlists, handle_remove_playlist};
pub use stream::handle_stream;
