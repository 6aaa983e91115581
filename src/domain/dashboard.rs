// Dashboard domain model - what the SBC summary shows for one snapshot
use super::overview::{HealthLevel, OverviewAggregate};

pub const DEFAULT_REGION_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Total,
    Health(HealthLevel),
    Region,
    AggregatedRows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub label: String,
    pub value: u64,
}

impl Tile {
    pub fn new(kind: TileKind, label: impl Into<String>, value: u64) -> Self {
        Self {
            kind,
            label: label.into(),
            value,
        }
    }

    /// CSS modifier class for the tile.
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            TileKind::Total => "sbc-total",
            TileKind::Health(HealthLevel::Disponivel) => "sbc-disponivel",
            TileKind::Health(HealthLevel::Moderado) => "sbc-moderado",
            TileKind::Health(HealthLevel::Atencao) => "sbc-atencao",
            TileKind::Health(HealthLevel::Critico) => "sbc-critico",
            TileKind::Region => "sbc-regional",
            TileKind::AggregatedRows => "sbc-agregado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine {
    Loaded {
        filename: String,
        modified_at: String,
        measurements: u64,
        cache_age_seconds: u64,
    },
    NotLoaded,
}

impl SourceLine {
    pub const NOT_LOADED_TEXT: &'static str = "Nenhuma fonte CSV carregada";
    pub const MISSING_DATE: &'static str = "—";

    pub fn measurements_text(measurements: u64) -> String {
        format!("{} medições", measurements)
    }

    pub fn cache_text(cache_age_seconds: u64) -> String {
        format!("Cache: {}s", cache_age_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub tiles: Vec<Tile>,
    pub source: SourceLine,
}

impl Dashboard {
    /// Build the visible groupings for a snapshot.
    ///
    /// Tiles come out in display order: total, health levels, top regions,
    /// then aggregated rows.
    pub fn from_overview(overview: &OverviewAggregate, region_limit: usize) -> Self {
        let mut tiles = vec![Tile::new(TileKind::Total, "Total de SBCs", overview.total_sbcs)];

        for level in HealthLevel::ALL {
            let count = overview.health_count(level);
            // "Disponível" always shows so an all-zero snapshot still reads as monitored
            if count == 0 && level != HealthLevel::Disponivel {
                continue;
            }
            tiles.push(Tile::new(TileKind::Health(level), level.label(), count));
        }

        let mut regions: Vec<_> = overview.por_regional.iter().collect();
        // sort_by is stable, so equal counts keep document order
        regions.sort_by(|a, b| b.count.cmp(&a.count));
        tiles.extend(
            regions
                .into_iter()
                .take(region_limit)
                .map(|r| Tile::new(TileKind::Region, r.name.clone(), r.count)),
        );

        if overview.dados_agregados_csv > 0 {
            tiles.push(Tile::new(
                TileKind::AggregatedRows,
                "Dados agregados (CSV)",
                overview.dados_agregados_csv,
            ));
        }

        Self {
            tiles,
            source: source_line(overview),
        }
    }
}

#[cfg(test)]
impl Dashboard {
    pub fn tiles_of(&self, kind: TileKind) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |t| t.kind == kind)
    }

    pub fn health_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles
            .iter()
            .filter(|t| matches!(t.kind, TileKind::Health(_)))
    }
}

fn source_line(overview: &OverviewAggregate) -> SourceLine {
    let Some(info) = overview.csv_info.as_ref() else {
        return SourceLine::NotLoaded;
    };
    let Some(filename) = info.loaded_filename() else {
        return SourceLine::NotLoaded;
    };

    SourceLine::Loaded {
        filename: filename.to_string(),
        modified_at: info
            .modified_at
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| SourceLine::MISSING_DATE.to_string()),
        measurements: info.total_measurements.unwrap_or(0),
        cache_age_seconds: info.cache_age_seconds.unwrap_or(0),
    }
}
