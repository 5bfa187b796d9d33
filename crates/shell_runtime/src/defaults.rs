//! Compiled-in settings catalogue used as the base layer of every effective tree.

use crate::settings::{section, tree_of, SettingsTree};

/// Returns the shell's default settings tree.
pub fn default_settings() -> SettingsTree {
    tree_of([
        ("language", "ru".into()),
        ("darkMode", true.into()),
        (
            "appearance",
            section([
                ("fontSize", "medium".into()),
                ("fontFamily", "Roboto".into()),
                ("accentColor", "#4285F4".into()),
                ("wallpaper", "default".into()),
                ("iconStyle", "default".into()),
                ("animations", true.into()),
            ]),
        ),
        (
            "notifications",
            section([
                ("enabled", true.into()),
                ("sound", true.into()),
                ("vibration", true.into()),
                ("doNotDisturb", false.into()),
                ("doNotDisturbStart", "23:00".into()),
                ("doNotDisturbEnd", "07:00".into()),
            ]),
        ),
        (
            "display",
            section([
                ("brightness", 70.into()),
                ("autoRotate", false.into()),
                ("nightMode", true.into()),
                ("nightModeStart", "22:00".into()),
                ("nightModeEnd", "06:00".into()),
                ("timeout", 30.into()),
            ]),
        ),
        (
            "sound",
            section([
                ("ringtoneVolume", 70.into()),
                ("mediaVolume", 80.into()),
                ("alarmVolume", 90.into()),
                ("notificationVolume", 60.into()),
                ("vibrationOnRing", true.into()),
                ("silentMode", false.into()),
            ]),
        ),
        (
            "privacy",
            section([
                ("locationEnabled", true.into()),
                ("cameraEnabled", true.into()),
                ("microphoneEnabled", true.into()),
                ("screenLock", "none".into()),
                ("biometricAuth", false.into()),
                ("showNotificationsOnLockScreen", true.into()),
            ]),
        ),
        (
            "toggleStates",
            section([
                ("wifi", true.into()),
                ("bluetooth", false.into()),
                ("dnd", false.into()),
                ("flashlight", false.into()),
                ("auto", false.into()),
                ("dark", true.into()),
                ("rotation", false.into()),
                ("battery", false.into()),
            ]),
        ),
        (
            "apps",
            section([
                (
                    "calculator",
                    section([
                        ("decimalPlaces", 2.into()),
                        ("scientificMode", false.into()),
                        ("historyEnabled", true.into()),
                    ]),
                ),
                (
                    "notes",
                    section([
                        ("autoSave", true.into()),
                        ("defaultFontSize", 16.into()),
                        ("sortBy", "modified".into()),
                    ]),
                ),
                (
                    "weather",
                    section([
                        ("units", "metric".into()),
                        ("defaultCity", "Москва".into()),
                        ("showHourlyForecast", true.into()),
                        ("showDailyForecast", true.into()),
                        ("refreshInterval", 30.into()),
                    ]),
                ),
                (
                    "calendar",
                    section([
                        ("weekStartsOn", 1.into()),
                        ("showWeekNumbers", true.into()),
                        ("defaultView", "month".into()),
                    ]),
                ),
            ]),
        ),
    ])
}
