//! Catalogue of protected dashboard surfaces.
//!
//! Each surface is identified by its Arabic label, which is what the
//! navigation shows and what string-keyed callers pass in. Labels are
//! matched exactly; no trimming or normalization.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    MainFactory,
    Treasury,
    MinyaCenter,
    MinyaTraders,
    SohagCenter,
    SohagTraders,
    DalaAlHawanemCenter,
    DalaAlHawanemTraders,
    GergaArabMallShowroom,
    GergaTraders,
    GazaCenter,
    GazaTraders,
}

impl Component {
    /// Catalogue order, which is also navigation order.
    pub const ALL: [Component; 12] = [
        Component::MainFactory,
        Component::Treasury,
        Component::MinyaCenter,
        Component::MinyaTraders,
        Component::SohagCenter,
        Component::SohagTraders,
        Component::DalaAlHawanemCenter,
        Component::DalaAlHawanemTraders,
        Component::GergaArabMallShowroom,
        Component::GergaTraders,
        Component::GazaCenter,
        Component::GazaTraders,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Component::MainFactory => "المصنع الرئيسي",
            Component::Treasury => "الخزينة العامة",
            Component::MinyaCenter => "سنتر المنيا",
            Component::MinyaTraders => "حسابات تجار سنتر المنيا",
            Component::SohagCenter => "سنتر سوهاج",
            Component::SohagTraders => "حسابات تجار سنتر سوهاج",
            Component::DalaAlHawanemCenter => "سنتر دلع الهوانم",
            Component::DalaAlHawanemTraders => "حسابات تجار سنتر دلع الهوانم",
            Component::GergaArabMallShowroom => "جرجا معرض مول العرب",
            Component::GergaTraders => "حسابات تجار جرجا",
            Component::GazaCenter => "سنتر غزة",
            Component::GazaTraders => "حساب تجار سنتر غزة",
        }
    }

    /// URL-safe identifier used in routes.
    pub fn slug(&self) -> &'static str {
        match self {
            Component::MainFactory => "main-factory",
            Component::Treasury => "treasury",
            Component::MinyaCenter => "minya-center",
            Component::MinyaTraders => "minya-traders",
            Component::SohagCenter => "sohag-center",
            Component::SohagTraders => "sohag-traders",
            Component::DalaAlHawanemCenter => "dala-center",
            Component::DalaAlHawanemTraders => "dala-traders",
            Component::GergaArabMallShowroom => "gerga-showroom",
            Component::GergaTraders => "gerga-traders",
            Component::GazaCenter => "gaza-center",
            Component::GazaTraders => "gaza-traders",
        }
    }

    /// Resource path on the remote accounts API backing this surface.
    pub fn api_path(&self) -> &'static str {
        match self {
            Component::MainFactory => "/factory",
            Component::Treasury => "/treasury",
            Component::MinyaCenter => "/centers/minya",
            Component::MinyaTraders => "/centers/minya/traders",
            Component::SohagCenter => "/centers/sohag",
            Component::SohagTraders => "/centers/sohag/traders",
            Component::DalaAlHawanemCenter => "/centers/dala",
            Component::DalaAlHawanemTraders => "/centers/dala/traders",
            Component::GergaArabMallShowroom => "/showrooms/gerga",
            Component::GergaTraders => "/showrooms/gerga/traders",
            Component::GazaCenter => "/centers/gaza",
            Component::GazaTraders => "/centers/gaza/traders",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
