impl<IN, NET, SRC, KV, R> ClockApp<IN, NET, SRC, KV, R>
where
    IN: InputProvider,
    NET: NetworkProvider,
    SRC: ClockSource,
    KV: KeyValueStore,
    R: Renderer,
{
    fn render_screen(&mut self, now_ms: u64) {
        match self.ctx.current {
            DeviceState::Init | DeviceState::WifiScan | DeviceState::WifiConnecting => {}
            DeviceState::LogoDisplay => self.renderer.show(Screen::Logo {
                title: APP_TITLE,
                version: self.version,
            }),
            DeviceState::StartupMessage => self.renderer.show(Screen::StartupMessage {
                title: APP_TITLE,
                line1: "WiFi setup",
                line2: "Scanning networks next",
            }),
            DeviceState::WifiList => {
                let screen = match self.networks.current() {
                    Some(candidate) => Screen::NetworkList {
                        network: NetworkView::from_candidate(candidate),
                        index: self.networks.cursor(),
                        total: self.networks.len(),
                    },
                    None => Screen::NoNetworks,
                };
                self.renderer.show(screen);
            }
            DeviceState::PasswordEntry => {
                let ssid = self
                    .ctx
                    .selected
                    .as_ref()
                    .map_or("", |candidate| candidate.ssid.as_str());
                self.renderer.show(Screen::PasswordEntry {
                    ssid,
                    entered: self.ctx.password.as_str(),
                    candidate: alphabet_char(self.ctx.char_index),
                });
            }
            DeviceState::WifiSuccess => {
                let ssid = self
                    .ctx
                    .selected
                    .as_ref()
                    .map_or("", |candidate| candidate.ssid.as_str());
                self.renderer.show(Screen::ConnectSuccess {
                    ssid,
                    address: self.local_address.as_str(),
                });
            }
            DeviceState::WifiFailure => {
                let ssid = self
                    .ctx
                    .selected
                    .as_ref()
                    .map_or("", |candidate| candidate.ssid.as_str());
                self.renderer.show(Screen::ConnectFailure { ssid });
            }
            DeviceState::Settings => self.render_settings(),
            DeviceState::TimeSync => self.renderer.show(Screen::TimeSyncing),
            DeviceState::ClockDisplay => self.render_clock_face(now_ms),
            DeviceState::WordClockDisplay => self.render_word_clock_status(now_ms),
        }
    }

    fn render_settings(&mut self) {
        let draft = self.draft;
        let rows = [
            SettingRowView {
                key: "Timezone",
                value: SettingValue::Label(timezone_name(draft.timezone_offset_hours)),
            },
            SettingRowView {
                key: "DST",
                value: SettingValue::Label(draft.dst_rule.label()),
            },
            SettingRowView {
                key: "Brightness",
                value: SettingValue::Percent(draft.brightness_percent),
            },
            SettingRowView {
                key: "Save",
                value: SettingValue::Action("Save & sync"),
            },
        ];

        self.renderer.show(Screen::Settings {
            rows: &rows,
            cursor: self.settings_cursor as usize,
            first_run: self.settings.settings().first_run,
        });
    }

    fn render_clock_face(&mut self, now_ms: u64) {
        self.last_shown_second = self.time.utc_now(now_ms);
        let local = self.time.now(now_ms);
        let time = format_time(local);
        let date = format_date(local);
        let zone = timezone_label(self.settings.settings().timezone_offset_hours);

        self.renderer.show(Screen::ClockFace {
            time: time.as_str(),
            date: date.as_str(),
            zone,
            status: self.time.status(),
        });
    }

    fn render_word_clock_status(&mut self, now_ms: u64) {
        self.last_shown_second = self.time.utc_now(now_ms);
        let local = self.time.now(now_ms);
        let time = format_time(local);
        let phrase = local.map(|t| Phrase::for_time(t.hour, t.minute).text());

        self.renderer.show(Screen::WordClockStatus {
            time: time.as_str(),
            phrase: phrase.as_ref().map_or("", |text| text.as_str()),
            status: self.time.status(),
            brightness_percent: self.settings.settings().brightness_percent,
        });
    }

    fn push_matrix_frame(&mut self, now_ms: u64) {
        let local = self.time.now(now_ms);
        let live = local.map_or(WordMask::EMPTY, |t| self.encoder.encode(t.hour, t.minute));

        let mask = match self.intro_started_ms {
            Some(started_ms) => match intro_mask_at(now_ms.saturating_sub(started_ms)) {
                Some(mask) => mask,
                None => {
                    debug!("matrix: intro finished");
                    self.intro_started_ms = None;
                    live
                }
            },
            None => live,
        };

        let brightness = scheduled_brightness(
            self.settings.settings().brightness_percent,
            local.map(|t| t.hour),
        );
        let phase = self.encoder.advance_phase();
        self.renderer.illuminate(MatrixFrame {
            mask,
            phase,
            brightness,
        });
    }
}
