//! Read-only queries over a merged channel list.

use serde::Serialize;

use crate::{channel::Channel, merge::locale_cmp};

/// Channels whose name or group title contains `term`, ignoring case.
/// An empty or blank term matches everything.
pub fn search<'a>(channels: &'a [Channel], term: &str) -> Vec<&'a Channel> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return channels.iter().collect();
    }

    channels
        .iter()
        .filter(|channel| {
            channel.name.to_lowercase().contains(&term)
                || channel
                    .group
                    .title
                    .as_deref()
                    .is_some_and(|title| title.to_lowercase().contains(&term))
        })
        .collect()
}

/// Channels sharing one group title.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelGroup<'a> {
    pub title: String,
    pub channels: Vec<&'a Channel>,
}

impl ChannelGroup<'_> {
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Bucket channels by group title, keeping their relative order within a
/// group. Groups are ordered by title.
pub fn group_channels<'a, I>(channels: I) -> Vec<ChannelGroup<'a>>
where
    I: IntoIterator<Item = &'a Channel>,
{
    let mut groups: Vec<ChannelGroup<'a>> = Vec::new();

    for channel in channels {
        let title = channel.group_title();
        match groups.iter_mut().find(|g| g.title == title) {
            Some(group) => group.channels.push(channel),
            None => groups.push(ChannelGroup {
                title: title.to_string(),
                channels: vec![channel],
            }),
        }
    }

    groups.sort_by(|a, b| locale_cmp(&a.title, &b.title));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::UNCATEGORIZED;

    fn channels() -> Vec<Channel> {
        let mut espn = Channel::new("ESPN", "http://a/espn.m3u8");
        espn.group.title = Some("Sports".to_string());
        let mut cnn = Channel::new("CNN", "http://a/cnn.m3u8");
        cnn.group.title = Some("News".to_string());
        let mut bbc = Channel::new("BBC World", "http://a/bbc.m3u8");
        bbc.group.title = Some("News".to_string());
        let misc = Channel::new("Sportsman Radio", "http://a/radio.mp3");
        vec![espn, cnn, bbc, misc]
    }

    #[test]
    fn test_search_by_name_and_group() {
        let list = channels();

        let names: Vec<_> = search(&list, "sports").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ESPN", "Sportsman Radio"]);

        let names: Vec<_> = search(&list, "bbc").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["BBC World"]);
    }

    #[test]
    fn test_search_empty_term_returns_all() {
        let list = channels();
        assert_eq!(search(&list, "").len(), list.len());
        assert_eq!(search(&list, "   ").len(), list.len());
    }

    #[test]
    fn test_search_no_match() {
        let list = channels();
        assert!(search(&list, "weather").is_empty());
    }

    #[test]
    fn test_group_channels() {
        let list = channels();
        let groups = group_channels(&list);

        let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["News", "Sports", UNCATEGORIZED]);

        let news: Vec<_> = groups[0].channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(news, vec!["CNN", "BBC World"]);
        assert_eq!(groups[2].len(), 1);
    }

    #[test]
    fn test_group_search_results() {
        let list = channels();
        let groups = group_channels(search(&list, "news"));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }
}
