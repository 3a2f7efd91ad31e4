//! Lucide icons for catalog entries.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{
    LdCopy, LdCrop, LdEraser, LdPalette, LdPencil, LdScissors, LdSparkles, LdUser, LdWand,
    LdZoomIn,
};
use retouch_workflow::IconTag;

/// Props for the [`OptionIcon`] component.
#[derive(Props, Clone, PartialEq)]
pub struct OptionIconProps {
    /// Which icon to draw.
    tag: IconTag,
    /// Edge length in pixels.
    #[props(default = 20)]
    size: u32,
}

/// The icon for a transformation option.
#[component]
pub fn OptionIcon(props: OptionIconProps) -> Element {
    let size = props.size;
    match props.tag {
        IconTag::Eraser => rsx! { Icon { width: size, height: size, icon: LdEraser } },
        IconTag::Scissors => rsx! { Icon { width: size, height: size, icon: LdScissors } },
        IconTag::Shadow => rsx! { Icon { width: size, height: size, icon: LdWand } },
        IconTag::Sparkles => rsx! { Icon { width: size, height: size, icon: LdSparkles } },
        IconTag::ZoomIn => rsx! { Icon { width: size, height: size, icon: LdZoomIn } },
        IconTag::Crop => rsx! { Icon { width: size, height: size, icon: LdCrop } },
        IconTag::User => rsx! { Icon { width: size, height: size, icon: LdUser } },
        IconTag::Copy => rsx! { Icon { width: size, height: size, icon: LdCopy } },
        IconTag::Palette => rsx! { Icon { width: size, height: size, icon: LdPalette } },
        IconTag::Edit => rsx! { Icon { width: size, height: size, icon: LdPencil } },
    }
}
