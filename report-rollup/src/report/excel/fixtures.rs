//! In-memory report workbooks for tests

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

/// Contents of the report date cell
#[derive(Debug, Clone)]
pub enum DateCell {
    Date(u16, u8, u8),
    Text(&'static str),
    Missing,
}

#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Bool(bool),
    Number(f64),
    Empty,
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// One daily sheet laid out like the real template
#[derive(Debug, Clone)]
pub struct DaySheet {
    pub name: String,
    pub date: DateCell,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl DaySheet {
    pub fn new(name: &str, date: DateCell, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_string(),
            date,
            header: standard_header(),
            rows,
        }
    }
}

pub fn standard_header() -> Vec<&'static str> {
    vec![
        "Champ / Zone",
        "Plateforme",
        "N° puits",
        "TAG Equipement",
        "Sous-equipement",
        "Metier",
        "Travail effectue + commentaires",
        "Terminé",
        "En cours",
        "Reporté",
        "Indisponible",
    ]
}

/// Status ticks in header order: termine, en_cours, reporte, indisponible
#[derive(Debug, Clone, Copy, Default)]
pub struct Ticks {
    pub termine: bool,
    pub en_cours: bool,
    pub reporte: bool,
    pub indisponible: bool,
}

pub const NONE: Ticks = Ticks {
    termine: false,
    en_cours: false,
    reporte: false,
    indisponible: false,
};
pub const DONE: Ticks = Ticks {
    termine: true,
    ..NONE
};
pub const RUNNING: Ticks = Ticks {
    en_cours: true,
    ..NONE
};
pub const POSTPONED: Ticks = Ticks {
    reporte: true,
    ..NONE
};

impl Ticks {
    pub fn down(self) -> Self {
        Ticks {
            indisponible: true,
            ..self
        }
    }
}

/// A data row for the standard header
pub fn action_row(zone: &str, tag: &str, description: &str, ticks: Ticks) -> Vec<Cell> {
    vec![
        zone.into(),
        "PF".into(),
        Cell::Number(1.0),
        tag.into(),
        "SOUS1".into(),
        "Prod".into(),
        description.into(),
        Cell::Bool(ticks.termine),
        Cell::Bool(ticks.en_cours),
        Cell::Bool(ticks.reporte),
        Cell::Bool(ticks.indisponible),
    ]
}

/// Write the sheets to an xlsx workbook held in memory
pub fn build_workbook(sheets: &[DaySheet]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for day in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&day.name).unwrap();

        match &day.date {
            DateCell::Date(y, m, d) => {
                let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                worksheet
                    .write_datetime_with_format(2, 8, &date, &date_format)
                    .unwrap();
            }
            DateCell::Text(text) => {
                worksheet.write_string(2, 8, *text).unwrap();
            }
            DateCell::Missing => {}
        }

        for (col, name) in day.header.iter().enumerate() {
            worksheet.write_string(4, col as u16, *name).unwrap();
        }

        for (i, row) in day.rows.iter().enumerate() {
            let r = (5 + i) as u32;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s).unwrap();
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(r, c, *b).unwrap();
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n).unwrap();
                    }
                    Cell::Empty => {}
                }
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}
