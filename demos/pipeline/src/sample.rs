//! Built-in sample inputs used when no run file is given.
//!
//! Three nodes on a line with two temperature sites: a cool park to the
//! west and a hot downtown zone to the east.  Agent 1 walks to work and
//! drives home; agent 2 bikes and gets stuck; `pt_1` is a bus driver and is
//! filtered out.

pub const CURVES_CSV: &str = "\
curve_id,step,value\n\
park,0,22.0\n\
park,1,24.5\n\
park,2,29.0\n\
park,3,25.0\n\
downtown,0,25.0\n\
downtown,1,28.0\n\
downtown,2,34.0\n\
downtown,3,29.5\n\
mrt_street,0,25.0\n\
mrt_street,1,38.0\n\
mrt_street,2,52.0\n\
mrt_street,3,33.0\n\
home,0,24.0\n\
office,0,22.5\n\
";

pub const SITES_CSV: &str = "\
curve_id,x,y\n\
park,0,0\n\
downtown,2000,0\n\
";

pub const ZONES_CSV: &str = "\
zone,curve_id\n\
cbd,downtown\n\
";

pub const NODES_CSV: &str = "\
node_id,x,y,zone\n\
n1,0,0,\n\
n2,900,0,\n\
n3,1800,0,cbd\n\
";

pub const LINKS_CSV: &str = "\
link_id,from_node,to_node,length,freespeed,capacity,modes,air_curve,radiant_curve\n\
l12,n1,n2,900,13.9,900,\"car,walk,bike\",,mrt_street\n\
l23,n2,n3,900,13.9,900,\"car,walk,bike\",,mrt_street\n\
l32,n3,n2,900,13.9,900,\"car,walk,bike\",,\n\
l21,n2,n1,900,13.9,900,\"car,walk,bike\",,\n\
";

pub const PARCELS_CSV: &str = "\
parcel_id,curve_id,x,y\n\
H1,home,0,0\n\
W1,office,1800,0\n\
";

pub const LINK_PARCELS_CSV: &str = "\
link_id,parcel_id\n\
l21,H1\n\
";

pub const ROUTES_CSV: &str = "\
person,mode,links,distance\n\
,walk,l21 l12 l23,1800\n\
,bike,l21 l12 l23,1800\n\
";

pub const EVENTS_CSV: &str = "\
time,type,person,link,actType,legMode\n\
27000,actend,1,l21,home,\n\
27000,departure,1,l21,,walk\n\
28200,travelled,1,,,walk\n\
28200,arrival,1,l23,,walk\n\
28200,actstart,1,l23,work,\n\
28500,actend,2,l21,home,\n\
28500,departure,2,l21,,bike\n\
28600,stuckAndAbort,2,l12,,bike\n\
30000,actend,pt_1,l12,pt interaction,\n\
61200,actend,1,l23,work,\n\
61200,departure,1,l23,,car\n\
61200,PersonEntersVehicle,1,,,\n\
62100,arrival,1,l21,,car\n\
62100,actstart,1,l21,home,\n\
";
