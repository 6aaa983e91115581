// Overview aggregate domain model - snapshot received from the SBC backend
use serde::Deserialize;
use serde::de::value::MapAccessDeserializer;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;

/// Operational status bucket of a monitored unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthLevel {
    Disponivel,
    Moderado,
    Atencao,
    Critico,
}

impl HealthLevel {
    /// Display priority order.
    pub const ALL: [HealthLevel; 4] = [
        HealthLevel::Disponivel,
        HealthLevel::Moderado,
        HealthLevel::Atencao,
        HealthLevel::Critico,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            HealthLevel::Disponivel => "disponivel",
            HealthLevel::Moderado => "moderado",
            HealthLevel::Atencao => "atencao",
            HealthLevel::Critico => "critico",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthLevel::Disponivel => "Disponível",
            HealthLevel::Moderado => "Moderado",
            HealthLevel::Atencao => "Atenção",
            HealthLevel::Critico => "Crítico",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCount {
    pub name: String,
    pub count: u64,
}

impl RegionCount {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Descriptor of the CSV file backing the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CsvInfo {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub total_measurements: Option<u64>,
    #[serde(default)]
    pub cache_age_seconds: Option<u64>,
}

impl CsvInfo {
    /// Filename of the loaded source. Empty names count as not loaded.
    pub fn loaded_filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OverviewAggregate {
    #[serde(default)]
    pub total_sbcs: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub por_saude: HashMap<String, u64>,
    /// Kept in document order; ranking ties depend on it.
    #[serde(default, deserialize_with = "ordered_counts")]
    pub por_regional: Vec<RegionCount>,
    #[serde(default)]
    pub dados_agregados_csv: u64,
    #[serde(default)]
    pub csv_info: Option<CsvInfo>,
}

impl OverviewAggregate {
    /// Decode a response body. Only a JSON object is an aggregate.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        let overview = (&mut deserializer).deserialize_map(ObjectOnly)?;
        deserializer.end()?;
        Ok(overview)
    }

    /// Count for a health level, zero when the backend omitted it.
    pub fn health_count(&self, level: HealthLevel) -> u64 {
        self.por_saude.get(level.key()).copied().unwrap_or(0)
    }
}

struct ObjectOnly;

impl<'de> Visitor<'de> for ObjectOnly {
    type Value = OverviewAggregate;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an overview object")
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        OverviewAggregate::deserialize(MapAccessDeserializer::new(map))
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn ordered_counts<'de, D>(deserializer: D) -> Result<Vec<RegionCount>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedCounts;

    impl<'de> Visitor<'de> for OrderedCounts {
        type Value = Vec<RegionCount>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of region name to count")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut regions: Vec<RegionCount> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            let mut positions: HashMap<String, usize> = HashMap::with_capacity(regions.capacity());
            while let Some((name, count)) = map.next_entry::<String, u64>()? {
                // A repeated key keeps its first position and takes the last value
                match positions.get(&name).copied() {
                    Some(index) => regions[index].count = count,
                    None => {
                        positions.insert(name.clone(), regions.len());
                        regions.push(RegionCount::new(name, count));
                    }
                }
            }
            Ok(regions)
        }
    }

    deserializer.deserialize_option(OrderedCounts)
}
