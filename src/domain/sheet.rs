// Sheet and layout domain models
use serde::{Deserialize, Serialize};

/// Canvas tiles the assistant knows how to place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileKey {
    KpiRevenue,
    KpiSales,
    KpiAvgSale,
    SalesforcePipeline,
    Spreadsheet,
    Chart,
    AbTest,
    WhatIf,
    Forecast,
    PivotTable,
}

/// A placed tile on a sheet's grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    #[serde(rename = "i")]
    pub key: TileKey,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub min_w: u32,
    pub min_h: u32,
}

impl LayoutItem {
    const fn new(key: TileKey, x: u32, y: u32, w: u32, h: u32, min_w: u32, min_h: u32) -> Self {
        Self {
            key,
            x,
            y,
            w,
            h,
            min_w,
            min_h,
        }
    }
}

/// Default placement of every tile, in the order they appear on the full dashboard
pub const TILE_CATALOG: [LayoutItem; 10] = [
    LayoutItem::new(TileKey::KpiRevenue, 0, 0, 4, 4, 3, 4),
    LayoutItem::new(TileKey::KpiSales, 4, 0, 4, 4, 3, 4),
    LayoutItem::new(TileKey::KpiAvgSale, 8, 0, 4, 4, 3, 4),
    LayoutItem::new(TileKey::SalesforcePipeline, 0, 23, 12, 9, 8, 7),
    LayoutItem::new(TileKey::Spreadsheet, 0, 4, 12, 12, 6, 8),
    LayoutItem::new(TileKey::Chart, 12, 4, 12, 9, 6, 6),
    LayoutItem::new(TileKey::AbTest, 12, 13, 12, 8, 6, 6),
    LayoutItem::new(TileKey::WhatIf, 12, 21, 12, 11, 6, 8),
    LayoutItem::new(TileKey::Forecast, 0, 16, 12, 7, 8, 6),
    LayoutItem::new(TileKey::PivotTable, 0, 32, 12, 9, 8, 6),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub name: String,
    pub layout: Vec<LayoutItem>,
}

impl Sheet {
    pub fn blank(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layout: Vec::new(),
        }
    }

    pub fn full_dashboard(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layout: TILE_CATALOG.to_vec(),
        }
    }

    pub fn has_tile(&self, key: TileKey) -> bool {
        self.layout.iter().any(|item| item.key == key)
    }

    /// Place catalog tiles that are not on the sheet yet. Returns how many were added.
    pub fn place_tiles(&mut self, keys: &[TileKey]) -> usize {
        let before = self.layout.len();
        for item in TILE_CATALOG.iter() {
            if keys.contains(&item.key) && !self.has_tile(item.key) {
                self.layout.push(item.clone());
            }
        }
        self.layout.len() - before
    }
}
