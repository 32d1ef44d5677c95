//! Media Tracks
//!
//! Audio track reporting used for sound detection.

/// Audio track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTrack {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub language: String,
    pub enabled: bool,
}

impl AudioTrack {
    pub fn new(id: &str, label: &str, language: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: "main".to_string(),
            label: label.to_string(),
            language: language.to_string(),
            enabled: true,
        }
    }
}

/// Audio track list as reported by the decoder.
///
/// `Unreported` means the platform exposes no audio information for the
/// current resource, which is distinct from an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AudioTrackList {
    #[default]
    Unreported,
    Reported(Vec<AudioTrack>),
}

impl AudioTrackList {
    pub fn new(tracks: Vec<AudioTrack>) -> Self {
        Self::Reported(tracks)
    }
    
    /// Whether the resource carries audio, `None` if unknown
    pub fn has_audio(&self) -> Option<bool> {
        match self {
            Self::Unreported => None,
            Self::Reported(tracks) => Some(tracks.iter().any(|t| t.enabled)),
        }
    }
    
    pub fn len(&self) -> usize {
        match self {
            Self::Unreported => 0,
            Self::Reported(tracks) => tracks.len(),
        }
    }
    
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_has_audio() {
        assert_eq!(AudioTrackList::Unreported.has_audio(), None);
        assert_eq!(AudioTrackList::new(Vec::new()).has_audio(), Some(false));
        
        let list = AudioTrackList::new(vec![AudioTrack::new("a1", "Main", "en")]);
        assert_eq!(list.has_audio(), Some(true));
        assert_eq!(list.len(), 1);
    }
    
    #[test]
    fn test_disabled_tracks_are_silent() {
        let mut track = AudioTrack::new("a1", "Commentary", "en");
        track.enabled = false;
        assert_eq!(AudioTrackList::new(vec![track]).has_audio(), Some(false));
    }
}
