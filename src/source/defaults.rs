/// A built-in playlist source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPlaylist {
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

/// Sources loaded when nothing else is.
pub const DEFAULT_PLAYLISTS: &[DefaultPlaylist] = &[
    DefaultPlaylist {
        name: "IPTV.org - MoveOnJoy US Channels",
        url: "https://raw.githubusercontent.com/iptv-org/iptv/refs/heads/master/streams/us_moveonjoy.m3u",
        description: "US channels from MoveOnJoy via IPTV.org",
    },
    DefaultPlaylist {
        name: "TVPass.org Playlist",
        url: "https://tvpass.org/playlist/m3u",
        description: "Channels from TVPass.org",
    },
    DefaultPlaylist {
        name: "IPTV.org - TheTVApp US Channels",
        url: "https://raw.githubusercontent.com/iptv-org/iptv/refs/heads/master/streams/us_thetvapp.m3u",
        description: "US channels from TheTVApp via IPTV.org",
    },
    DefaultPlaylist {
        name: "IPTV.org - TVPass US Channels",
        url: "https://raw.githubusercontent.com/iptv-org/iptv/refs/heads/master/streams/us_tvpass.m3u",
        description: "US channels from TVPass via IPTV.org",
    },
    DefaultPlaylist {
        name: "IPTV.org - US Local Channels",
        url: "https://raw.githubusercontent.com/Cat-Ling/iptv-org/refs/heads/master/streams/us_local.m3u",
        description: "US local TV channels via IPTV.org",
    },
    DefaultPlaylist {
        name: "IPTV.org - US Channels",
        url: "https://raw.githubusercontent.com/Cat-Ling/iptv-org/refs/heads/master/streams/us.m3u",
        description: "General US channels from IPTV.org",
    },
    DefaultPlaylist {
        name: "GitHub IPTV Big List",
        url: "https://gist.githubusercontent.com/onigetoc/8ed7263e644b7d121d0275c805f1ee4a/raw/8c141f092e795ce68b2f9190a988df1be5d2a0c6/IPTV-big-list.m3u",
        description: "Big list of various channels from GitHub",
    },
];
